use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::state::AppState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::{get, post},
};
use inference::{InferenceBackend, ModelSource};
use schema::{CatalogEntry, FoodReport};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

pub fn router<B, S>(pipeline: Arc<Pipeline<B, S>>, max_upload_bytes: usize) -> Router
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    let state = AppState { pipeline };

    Router::new()
        .route("/health", get(health::<B, S>))
        .route("/labels", get(labels::<B, S>))
        .route("/predict", post(predict::<B, S>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    model_loaded: bool,
}

async fn health<B, S>(State(state): State<AppState<B, S>>) -> Json<Health>
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    Json(Health {
        status: "ok",
        model_loaded: state.pipeline.model_ready(),
    })
}

async fn labels<B, S>(State(state): State<AppState<B, S>>) -> Json<Vec<CatalogEntry>>
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    Json(state.pipeline.catalog().entries())
}

async fn predict<B, S>(
    State(state): State<AppState<B, S>>,
    request: Request,
) -> Result<Json<FoodReport>, PipelineError>
where
    B: InferenceBackend + 'static,
    S: ModelSource + 'static,
{
    let image = read_upload(request).await?;
    tracing::debug!(bytes = image.len(), "Upload received");

    let report = state.pipeline.run(image).await?;
    Ok(Json(report))
}

/// Accept either a multipart form with an `image` field or the raw file as
/// the request body.
async fn read_upload(request: Request) -> Result<Vec<u8>, PipelineError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| PipelineError::upload_rejected(e.status(), e.body_text()))?;
        return Ok(body.to_vec());
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| PipelineError::upload_rejected(e.status(), e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PipelineError::upload_rejected(e.status(), e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| PipelineError::upload_rejected(e.status(), e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(PipelineError::BadRequest(format!(
        "multipart upload has no `{}` field",
        IMAGE_FIELD
    )))
}
