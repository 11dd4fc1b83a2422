use crate::logging::{env_filter, fmt_layer};
use crate::{Environment, LogLevel};
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
};
use opentelemetry_semantic_conventions::attribute::{
    DEPLOYMENT_ENVIRONMENT_NAME, SERVICE_NAME, SERVICE_VERSION,
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often pipeline counters and latency histograms are pushed to the collector.
pub const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(15);

/// Owns the OTLP span and metric pipelines for one process. Buffered spans
/// and the last metric window are flushed when it is dropped, so keep it
/// alive until the server has shut down.
pub struct TelemetryGuard {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl TelemetryGuard {
    /// Install the global subscriber with an extra layer that forwards
    /// `tracing` spans to `endpoint`, and register a meter provider so
    /// `global::meter` instruments export there too.
    pub fn init(
        service_name: &str,
        endpoint: &str,
        log_level: LogLevel,
        environment: Environment,
    ) -> anyhow::Result<Self> {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let resource = service_resource(service_name, environment);
        let tracer_provider = build_tracer_provider(endpoint, resource.clone())?;
        let meter_provider = build_meter_provider(endpoint, resource)?;

        global::set_tracer_provider(tracer_provider.clone());
        global::set_meter_provider(meter_provider.clone());

        let otel_layer =
            tracing_opentelemetry::layer().with_tracer(global::tracer(service_name.to_string()));

        tracing_subscriber::registry()
            .with(env_filter(log_level))
            .with(otel_layer)
            .with(fmt_layer(environment))
            .try_init()?;

        Ok(Self {
            tracer_provider,
            meter_provider,
        })
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Err(e) = self.tracer_provider.shutdown() {
            eprintln!("Span export did not flush: {:?}", e);
        }
        if let Err(e) = self.meter_provider.shutdown() {
            eprintln!("Metric export did not flush: {:?}", e);
        }
    }
}

/// Attributes attached to every exported span and metric point.
pub fn service_resource(service_name: &str, environment: Environment) -> Resource {
    Resource::builder()
        .with_attributes([
            KeyValue::new(SERVICE_NAME, service_name.to_string()),
            KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
            KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, environment.as_str()),
        ])
        .build()
}

fn build_tracer_provider(endpoint: &str, resource: Resource) -> anyhow::Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
        .with_batch_exporter(exporter)
        .build())
}

fn build_meter_provider(endpoint: &str, resource: Resource) -> anyhow::Result<SdkMeterProvider> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(METRIC_EXPORT_INTERVAL)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build())
}

/// Creates an info-level span and enters it.
#[macro_export]
macro_rules! span {
    ($name:literal) => {
        tracing::info_span!($name).entered()
    };
}

/// Creates a debug-level span and enters it.
#[macro_export]
macro_rules! span_debug {
    ($name:literal) => {
        tracing::debug_span!($name).entered()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::{Key, Value};

    #[test]
    fn test_service_resource_attributes() {
        let resource = service_resource("food-gateway", Environment::Production);

        assert_eq!(
            resource.get(&Key::from_static_str(SERVICE_NAME)),
            Some(Value::from("food-gateway"))
        );
        assert_eq!(
            resource.get(&Key::from_static_str(DEPLOYMENT_ENVIRONMENT_NAME)),
            Some(Value::from("production"))
        );
        assert!(
            resource
                .get(&Key::from_static_str(SERVICE_VERSION))
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_rejected() {
        let result = TelemetryGuard::init(
            "food-gateway",
            "not a collector",
            LogLevel::Info,
            Environment::Development,
        );

        assert!(result.is_err());
    }
}
