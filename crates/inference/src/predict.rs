use crate::backend::InferenceBackend;
use crate::error::{InferenceError, PredictError};
use crate::postprocessing::argmax;
use common::span;
use preprocess::CpuPreProcessor;
use schema::{LabelCatalog, Prediction};

/// Classify an uploaded JPEG/PNG and return the winning class index.
///
/// The score vector must have exactly `num_classes` entries; a different
/// width means the model and the label catalog are out of sync.
pub fn predict<B: InferenceBackend + ?Sized>(
    model: &B,
    preprocessor: &mut CpuPreProcessor,
    image: &[u8],
    num_classes: usize,
) -> Result<usize, PredictError> {
    let _s = span!("predict");

    let input = preprocessor.preprocess_upload(image)?;

    let scores = {
        let _infer_span = tracing::info_span!("model_inference").entered();
        model.infer(&input)?
    };

    if scores.len() != num_classes {
        return Err(InferenceError::OutputWidth {
            expected: num_classes,
            actual: scores.len(),
        }
        .into());
    }

    let index = argmax(&scores).ok_or_else(|| {
        InferenceError::Runtime("model returned no finite scores".to_string())
    })?;

    tracing::debug!(index, score = scores[index], "Predicted class");
    Ok(index)
}

/// [`predict`], resolved against the label catalog.
pub fn classify<B: InferenceBackend + ?Sized>(
    model: &B,
    preprocessor: &mut CpuPreProcessor,
    image: &[u8],
    catalog: &LabelCatalog,
) -> Result<Prediction, PredictError> {
    let index = predict(model, preprocessor, image, catalog.len())?;

    // predict() already checked the width against the catalog
    let name = catalog.name(index).unwrap_or_default().to_string();
    let display_name = catalog.display_name(index).unwrap_or_default();

    Ok(Prediction {
        index,
        name,
        display_name,
    })
}
