use crate::config::ModelConfig;
use crate::error::{InferenceError, ModelLoadError};
use ndarray::{Array, IxDyn};

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded image classifier.
///
/// Implementations are shared read-only across requests once loaded, so
/// `infer` takes `&self`; any interior mutability is the backend's concern.
pub trait InferenceBackend: Send + Sync {
    /// Deserialize a model from its serialized bytes.
    fn load_model(bytes: &[u8], config: &ModelConfig) -> Result<Self, ModelLoadError>
    where
        Self: Sized;

    /// Score one batch-of-one image tensor, returning one score per class.
    fn infer(&self, input: &Array<f32, IxDyn>) -> Result<Vec<f32>, InferenceError>;
}
