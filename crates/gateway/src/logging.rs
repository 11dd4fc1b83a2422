use crate::config::Config;
use common::TelemetryGuard;

/// Install the tracing subscriber. With an OTLP endpoint configured, spans and
/// metrics are exported too and the returned guard flushes them on drop.
pub fn setup_logging(config: &Config, service_name: &str) -> anyhow::Result<Option<TelemetryGuard>> {
    match &config.otel_endpoint {
        Some(endpoint) => {
            let guard = TelemetryGuard::init(
                service_name,
                endpoint,
                config.log_level,
                config.environment,
            )?;
            tracing::info!(endpoint = %endpoint, "OpenTelemetry export enabled");
            Ok(Some(guard))
        }
        None => {
            common::setup_logging(config.log_level, config.environment);
            Ok(None)
        }
    }
}
