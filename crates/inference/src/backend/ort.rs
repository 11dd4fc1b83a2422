use super::InferenceBackend;
use crate::config::ModelConfig;
use crate::error::{InferenceError, ModelLoadError};
use ndarray::{Array, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::sync::Mutex;

/// ONNX Runtime classifier on the CPU execution provider.
///
/// `Session::run` needs `&mut`, so the session sits behind a mutex and
/// concurrent requests score one at a time.
pub struct OrtBackend {
    session: Mutex<Session>,
}

impl OrtBackend {
    fn build_session(bytes: &[u8], intra_threads: usize) -> anyhow::Result<Session> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_memory(bytes)?;

        Ok(session)
    }

    fn run(&self, input: &Array<f32, IxDyn>) -> anyhow::Result<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;

        let outputs = session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;
        let scores = outputs[0].try_extract_array::<f32>()?;

        Ok(scores.iter().copied().collect())
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(bytes: &[u8], config: &ModelConfig) -> Result<Self, ModelLoadError> {
        tracing::info!(
            model_bytes = bytes.len(),
            intra_threads = config.intra_threads,
            "Initializing ONNX Runtime with CPU execution provider"
        );

        let session = Self::build_session(bytes, config.intra_threads)
            .map_err(|e| ModelLoadError::Deserialize(e.to_string()))?;

        tracing::info!("Model session ready");

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn infer(&self, input: &Array<f32, IxDyn>) -> Result<Vec<f32>, InferenceError> {
        if self.session.is_poisoned() {
            return Err(InferenceError::Poisoned);
        }
        self.run(input)
            .map_err(|e| InferenceError::Runtime(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_to_deserialize() {
        let result = OrtBackend::load_model(b"definitely not an onnx graph", &ModelConfig::default());

        assert!(
            matches!(result, Err(ModelLoadError::Deserialize(_))),
            "Non-ONNX bytes should surface as a deserialization error"
        );
    }
}
