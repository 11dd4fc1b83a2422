use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inference::{InferenceError, ModelLoadError, PredictError};
use lookup::LookupError;
use preprocess::ImageError;
use serde::Serialize;
use thiserror::Error;

/// Every way a single upload can fail to produce a report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error("Invalid image: {0}")]
    InvalidImage(ImageError),

    #[error(transparent)]
    Inference(InferenceError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The request did not carry an image we could read.
    #[error("Bad upload: {0}")]
    BadRequest(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),
}

impl From<PredictError> for PipelineError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::InvalidImage(e) => PipelineError::InvalidImage(e),
            PredictError::Inference(e) => PipelineError::Inference(e),
        }
    }
}

impl PipelineError {
    /// Map an extractor rejection while reading the upload. Only the body
    /// limit keeps its own status; everything else is a bad request.
    pub fn upload_rejected(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            PipelineError::PayloadTooLarge(message)
        } else {
            PipelineError::BadRequest(message)
        }
    }

    /// Stable machine-readable category, also used as a metric attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ModelLoad(_) => "model_load",
            PipelineError::InvalidImage(_) => "invalid_image",
            PipelineError::Inference(_) => "inference",
            PipelineError::Lookup(LookupError::DataFetch { .. }) => "data_fetch",
            PipelineError::Lookup(LookupError::RecordNotFound { .. }) => "record_not_found",
            PipelineError::Lookup(LookupError::UnknownLabel { .. }) => "unknown_label",
            PipelineError::BadRequest(_) => "bad_request",
            PipelineError::PayloadTooLarge(_) => "payload_too_large",
        }
    }

    /// Whether the same request may succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            PipelineError::ModelLoad(e) => e.is_transient(),
            PipelineError::Lookup(e) => e.is_transient(),
            _ => false,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            PipelineError::InvalidImage(_) | PipelineError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            PipelineError::Lookup(LookupError::DataFetch { .. }) => StatusCode::BAD_GATEWAY,
            PipelineError::Lookup(_) | PipelineError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl From<&PipelineError> for ErrorBody {
    fn from(err: &PipelineError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_transient(),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Prediction failed");
        } else {
            tracing::info!(kind = self.kind(), error = %self, "Prediction rejected");
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
