//! Upload bytes in, [`FoodReport`] out.
//!
//! Stages run in a fixed order: obtain the cached model, classify on a
//! blocking thread, then fetch the recipe and nutrition rows concurrently.
//! The first failing stage decides the error.

use crate::error::PipelineError;
use inference::{
    InferenceBackend, InferenceError, ModelConfig, ModelLoadError, ModelProvider, ModelSource,
};
use lookup::LookupClient;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use preprocess::CpuPreProcessor;
use schema::{FoodReport, LabelCatalog, Prediction};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

struct PipelineMetrics {
    duration: Histogram<f64>,
    predictions: Counter<u64>,
    errors: Counter<u64>,
}

fn init_metrics(meter_name: &'static str) -> PipelineMetrics {
    let meter = global::meter(meter_name);
    // Dataset downloads dominate, so buckets reach well past a second
    let latency_buckets = [
        0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0, 30.0,
    ];

    PipelineMetrics {
        duration: meter
            .f64_histogram("pipeline_duration_seconds")
            .with_description("Time from upload to report (model, inference, lookups)")
            .with_unit("s")
            .with_boundaries(latency_buckets.to_vec())
            .build(),
        predictions: meter
            .u64_counter("predictions_total")
            .with_description("Reports produced, by predicted dish")
            .build(),
        errors: meter
            .u64_counter("pipeline_errors_total")
            .with_description("Failed uploads, by error kind")
            .build(),
    }
}

pub struct Pipeline<B, S> {
    provider: ModelProvider<B, S>,
    lookup: LookupClient,
    catalog: Arc<LabelCatalog>,
    model_config: ModelConfig,
    metrics: PipelineMetrics,
}

impl<B, S> Pipeline<B, S>
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    pub fn new(
        provider: ModelProvider<B, S>,
        lookup: LookupClient,
        catalog: LabelCatalog,
        model_config: ModelConfig,
    ) -> Self {
        Self {
            provider,
            lookup,
            catalog: Arc::new(catalog),
            model_config,
            metrics: init_metrics("gateway"),
        }
    }

    pub fn catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    pub fn lookup(&self) -> &LookupClient {
        &self.lookup
    }

    /// Whether the model load has finished, successfully or not.
    pub fn model_ready(&self) -> bool {
        self.provider.is_initialized()
    }

    /// Trigger the model load without classifying anything.
    pub async fn warm_up(&self) -> Result<(), ModelLoadError> {
        self.provider.get_model().await.map(|_| ())
    }

    /// Classify `image` and resolve the label against the catalog.
    pub async fn classify(&self, image: Vec<u8>) -> Result<Prediction, PipelineError> {
        let model = self.provider.get_model().await?;

        let catalog = Arc::clone(&self.catalog);
        let input_size = self.model_config.input_size();
        let layout = self.model_config.layout;

        let prediction = tokio::task::spawn_blocking(move || {
            let mut preprocessor = CpuPreProcessor::with_layout(input_size, layout);
            inference::classify(model.as_ref(), &mut preprocessor, &image, &catalog)
        })
        .await
        .map_err(|e| {
            PipelineError::Inference(InferenceError::Runtime(format!(
                "classifier task failed: {}",
                e
            )))
        })??;

        Ok(prediction)
    }

    /// Full report for one upload. Records latency and outcome metrics.
    pub async fn run(&self, image: Vec<u8>) -> Result<FoodReport, PipelineError> {
        let start = Instant::now();
        let result = self
            .run_stages(image)
            .instrument(tracing::info_span!("food_pipeline"))
            .await;
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(report) => {
                self.metrics.duration.record(elapsed, &[KeyValue::new("outcome", "ok")]);
                self.metrics
                    .predictions
                    .add(1, &[KeyValue::new("dish", report.dish.name.clone())]);
                tracing::info!(
                    dish = %report.dish.name,
                    index = report.dish.index,
                    elapsed_ms = elapsed * 1000.0,
                    "Report ready"
                );
            }
            Err(e) => {
                self.metrics
                    .duration
                    .record(elapsed, &[KeyValue::new("outcome", "error")]);
                self.metrics.errors.add(1, &[KeyValue::new("kind", e.kind())]);
            }
        }

        result
    }

    async fn run_stages(&self, image: Vec<u8>) -> Result<FoodReport, PipelineError> {
        let dish = self.classify(image).await?;

        let ((ingredient, step), nutrition) = tokio::try_join!(
            self.lookup.get_recipe(dish.index, &self.catalog),
            self.lookup.get_nutrition(dish.index, &self.catalog),
        )?;

        Ok(FoodReport {
            dish,
            ingredient,
            step,
            nutrition,
        })
    }
}
