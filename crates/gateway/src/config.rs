use common::{Environment, HttpSettings, LogLevel, RetrySettings};
use inference::ModelConfig;
use lookup::{DEFAULT_NUTRITION_URL, DEFAULT_RECIPE_URL, DatasetConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub log_level: LogLevel,
    pub environment: Environment,
    /// OTLP collector; plain logging only when unset
    #[serde(default)]
    pub otel_endpoint: Option<String>,
    pub server: ServerSettings,
    pub model: ModelConfig,
    pub datasets: DatasetConfig,
    pub http: HttpSettings,
    pub retry: RetrySettings,
    pub verify_datasets_on_startup: bool,
    pub max_upload_bytes: usize,
}

pub fn get_configuration() -> Result<Config, config::ConfigError> {
    build_configuration(
        config::Environment::with_prefix("GATEWAY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}

fn build_configuration(env: config::Environment) -> Result<Config, config::ConfigError> {
    let defaults = ModelConfig::default();

    let config = config::Config::builder()
        .set_default("log_level", "info")?
        .set_default("environment", "development")?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("model.url", defaults.url)?
        .set_default("model.input_width", defaults.input_width)?
        .set_default("model.input_height", defaults.input_height)?
        .set_default("model.layout", "nhwc")?
        .set_default("model.intra_threads", defaults.intra_threads as u64)?
        .set_default("datasets.recipe_url", DEFAULT_RECIPE_URL)?
        .set_default("datasets.nutrition_url", DEFAULT_NUTRITION_URL)?
        .set_default("http.request_timeout_secs", 30)?
        .set_default("http.connect_timeout_secs", 10)?
        .set_default("retry.max_attempts", 3)?
        .set_default("retry.base_delay_ms", 250)?
        .set_default("retry.max_delay_ms", 2000)?
        .set_default("verify_datasets_on_startup", false)?
        .set_default("max_upload_bytes", 10 * 1024 * 1024)?
        .add_source(env)
        .build()?;

    let config: Config = config.try_deserialize::<Config>()?;

    Ok(config)
}
