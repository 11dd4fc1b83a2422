use crate::config::Config;
use crate::pipeline::Pipeline;
use anyhow::Context;
use common::{RetryPolicy, build_client};
use inference::{HttpModelSource, InferenceBackend, ModelProvider, ModelSource, OrtBackend};
use lookup::LookupClient;
use schema::LabelCatalog;

pub type FoodPipeline = Pipeline<OrtBackend, HttpModelSource>;

/// Wire the ONNX model provider and dataset client from configuration.
/// Nothing is fetched until the first prediction or [`Pipeline::warm_up`].
pub fn build_pipeline(config: &Config) -> anyhow::Result<FoodPipeline> {
    let http = build_client(&config.http).context("Failed to build HTTP client")?;
    let retry = RetryPolicy::from(&config.retry);
    let catalog = LabelCatalog::default();

    let lookup = LookupClient::new(http.clone(), &config.datasets, retry);
    let source = HttpModelSource::new(http, &config.model, retry);
    let provider = ModelProvider::new(source, config.model.clone(), catalog.len());

    Ok(Pipeline::new(provider, lookup, catalog, config.model.clone()))
}

/// Fail unless every catalog label resolves to exactly one row in each
/// dataset.
pub async fn verify_datasets<B, S>(pipeline: &Pipeline<B, S>) -> anyhow::Result<()>
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    let mismatches = pipeline
        .lookup()
        .verify_catalog(pipeline.catalog())
        .await
        .context("Failed to load datasets for verification")?;

    if !mismatches.is_empty() {
        anyhow::bail!(
            "{} catalog label(s) do not resolve to exactly one dataset row",
            mismatches.len()
        );
    }

    tracing::info!(
        labels = pipeline.catalog().len(),
        "Datasets cover the label catalog"
    );
    Ok(())
}
