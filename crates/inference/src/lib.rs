pub mod backend;
pub mod config;
pub mod error;
pub mod postprocessing;
pub mod predict;
pub mod provider;

// Re-export commonly used types for convenience
pub use backend::InferenceBackend;
#[cfg(feature = "ort-backend")]
pub use backend::ort::OrtBackend;
pub use config::ModelConfig;
pub use error::{InferenceError, ModelLoadError, PredictError};
pub use postprocessing::argmax;
pub use predict::{classify, predict};
pub use provider::{HttpModelSource, ModelProvider, ModelSource};
