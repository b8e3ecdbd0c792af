//! Model listing passthrough

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::Result;
use crate::server::state::AppState;

/// GET /openai/:database/v1/models
///
/// chatbot-ui needs this to populate its model picker. Status and body are
/// the backend's own.
pub async fn list_models(
    State(state): State<AppState>,
    Path(_database): Path<String>,
) -> Result<Response> {
    let backend = state.pipeline().list_models().await.map_err(|e| {
        tracing::error!("Error getting models: {}", e);
        e
    })?;

    let status = StatusCode::from_u16(backend.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = backend
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut response = (status, backend.body).into_response();
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}
