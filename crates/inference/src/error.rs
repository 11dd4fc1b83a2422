use common::FetchError;
use preprocess::ImageError;
use thiserror::Error;

/// The classifier could not be obtained. Cached by the provider, so every
/// request after a failed load sees the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelLoadError {
    #[error("Failed to fetch model: {reason}")]
    Fetch { reason: String, transient: bool },

    #[error("Model digest mismatch: expected sha256 {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("Failed to deserialize model: {0}")]
    Deserialize(String),

    #[error("Model outputs {actual} scores but the label catalog has {expected} entries")]
    OutputWidthMismatch { expected: usize, actual: usize },

    #[error("Model warm-up failed: {0}")]
    Verification(String),
}

impl ModelLoadError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ModelLoadError::Fetch { transient: true, .. })
    }
}

impl From<FetchError> for ModelLoadError {
    fn from(err: FetchError) -> Self {
        ModelLoadError::Fetch {
            transient: err.is_transient(),
            reason: err.to_string(),
        }
    }
}

/// The scoring call failed on an already-loaded model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Inference runtime error: {0}")]
    Runtime(String),

    #[error("Model returned {actual} scores, expected {expected}")]
    OutputWidth { expected: usize, actual: usize },

    #[error("Model session lock poisoned")]
    Poisoned,
}

/// Anything that can go wrong between upload bytes and a label index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}
