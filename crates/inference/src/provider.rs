//! Process-wide classifier cache.
//!
//! The first `get_model` call fetches, deserializes and verifies the model.
//! Concurrent first callers all wait on that single load. The outcome, success
//! or failure, is kept for the lifetime of the provider: there is no refresh
//! and no fallback model.

use crate::backend::InferenceBackend;
use crate::config::ModelConfig;
use crate::error::ModelLoadError;
use common::{Location, RetryPolicy, fetch_bytes, retry_with_backoff, span};
use ndarray::{Array, IxDyn};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Where model bytes come from.
pub trait ModelSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, ModelLoadError>> + Send;

    fn describe(&self) -> String;
}

/// Downloads the model over HTTP(S) (or reads a local path), retrying
/// transient failures and checking the optional sha256 pin.
pub struct HttpModelSource {
    client: Client,
    location: Location,
    sha256: Option<String>,
    retry: RetryPolicy,
}

impl HttpModelSource {
    pub fn new(client: Client, config: &ModelConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            location: Location::parse(&config.url),
            sha256: config.sha256.as_ref().map(|d| d.trim().to_lowercase()),
            retry,
        }
    }
}

impl ModelSource for HttpModelSource {
    async fn fetch(&self) -> Result<Vec<u8>, ModelLoadError> {
        let bytes = retry_with_backoff(
            || fetch_bytes(&self.client, &self.location),
            &self.retry,
            "Model download",
            |e| e.is_transient(),
        )
        .await?;

        if let Some(expected) = &self.sha256 {
            verify_digest(&bytes, expected)?;
        }

        Ok(bytes)
    }

    fn describe(&self) -> String {
        self.location.to_string()
    }
}

pub fn verify_digest(bytes: &[u8], expected: &str) -> Result<(), ModelLoadError> {
    let actual = hex::encode(Sha256::digest(bytes));
    if actual != expected {
        return Err(ModelLoadError::DigestMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Lazily loads one `B` per provider and hands out shared references to it.
///
/// The load runs in its own task, so a caller that is dropped mid-load (a
/// client disconnect, say) never cancels it and no waiter starts a second
/// fetch.
pub struct ModelProvider<B, S> {
    inner: Arc<ProviderInner<B, S>>,
}

struct ProviderInner<B, S> {
    source: S,
    config: ModelConfig,
    num_classes: usize,
    cell: OnceCell<Result<Arc<B>, ModelLoadError>>,
    _backend: PhantomData<fn() -> B>,
}

impl<B, S> ModelProvider<B, S>
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    /// `num_classes` is the label catalog length the model must score.
    pub fn new(source: S, config: ModelConfig, num_classes: usize) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                source,
                config,
                num_classes,
                cell: OnceCell::new(),
                _backend: PhantomData,
            }),
        }
    }

    /// Return the cached model, loading it on first use.
    pub async fn get_model(&self) -> Result<Arc<B>, ModelLoadError> {
        if let Some(outcome) = self.inner.cell.get() {
            return outcome.clone();
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.cell.get_or_init(|| inner.load()).await.clone() })
            .await
            .map_err(|e| ModelLoadError::Deserialize(format!("loader task failed: {}", e)))?
    }

    /// Whether a load has completed (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.inner.cell.initialized()
    }
}

impl<B, S> ProviderInner<B, S>
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    async fn load(&self) -> Result<Arc<B>, ModelLoadError> {
        tracing::info!(source = %self.source.describe(), "Loading classifier model");

        let bytes = self.source.fetch().await?;

        let config = self.config.clone();
        let num_classes = self.num_classes;
        let model = tokio::task::spawn_blocking(move || {
            let _s = span!("deserialize_model");
            let model = B::load_model(&bytes, &config)?;
            verify_output_width(&model, &config, num_classes)?;
            Ok::<_, ModelLoadError>(model)
        })
        .await
        .map_err(|e| ModelLoadError::Deserialize(format!("loader task failed: {}", e)))?;

        match model {
            Ok(model) => {
                tracing::info!(num_classes, "Model loaded successfully");
                Ok(Arc::new(model))
            }
            Err(e) => {
                tracing::error!(error = %e, "Model load failed; predictions disabled");
                Err(e)
            }
        }
    }
}

/// Score an all-zero input once and check the output width against the
/// label catalog, so a catalog/model mismatch fails at load time rather than
/// producing wrong dish names.
pub fn verify_output_width<B: InferenceBackend + ?Sized>(
    model: &B,
    config: &ModelConfig,
    num_classes: usize,
) -> Result<(), ModelLoadError> {
    let shape = config
        .layout
        .shape(config.input_width as usize, config.input_height as usize);
    let blank = Array::<f32, IxDyn>::zeros(IxDyn(&shape));

    let scores = model
        .infer(&blank)
        .map_err(|e| ModelLoadError::Verification(e.to_string()))?;

    if scores.len() != num_classes {
        return Err(ModelLoadError::OutputWidthMismatch {
            expected: num_classes,
            actual: scores.len(),
        });
    }

    Ok(())
}
