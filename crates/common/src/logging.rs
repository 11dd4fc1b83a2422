use crate::config::{Environment, LogLevel};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

/// Initialize tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// Use `TelemetryGuard::init` instead when spans should also be exported over OTLP.
pub fn setup_logging(log_level: LogLevel, environment: Environment) {
    let result = tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(fmt_layer(environment))
        .try_init();

    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {}", e);
    }
}

pub(crate) fn env_filter(log_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()))
}

/// JSON lines in production, pretty multi-line output in development.
pub(crate) fn fmt_layer<S>(environment: Environment) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match environment {
        Environment::Production => tracing_subscriber::fmt::layer()
            .json()
            .with_level(true)
            .boxed(),
        Environment::Development => tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(true)
            .boxed(),
    }
}
