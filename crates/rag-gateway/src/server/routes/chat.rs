//! Chat completion endpoint with retrieval augmentation

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::StreamExt;
use std::convert::Infallible;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::pipeline::ChatOutcome;
use crate::relay::StreamRelay;
use crate::server::state::AppState;
use crate::types::ChatRequest;

/// POST /openai/:database/v1/chat/completions
///
/// The `database` segment is accepted for client compatibility and ignored.
pub async fn chat_completions(
    State(state): State<AppState>,
    Path(_database): Path<String>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|e| Error::invalid_request(e.body_text()))?;

    tracing::info!(
        "Chat request: model={}, messages={}, stream={}",
        request.model,
        request.messages.len(),
        request.stream
    );

    match state.pipeline().chat(request).await? {
        ChatOutcome::Completion(body) => {
            tracing::info!("Completion relayed in {}ms", start.elapsed().as_millis());
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response())
        }
        ChatOutcome::Stream(relay) => event_stream(relay),
    }
}

/// Wrap the relay in a `text/event-stream` response.
///
/// The body is polled by the connection, so each backend chunk is read only
/// after the previous frame was accepted; a dropped connection drops the
/// relay and with it the backend request.
fn event_stream(relay: StreamRelay) -> Result<Response> {
    let frames = relay
        .into_frames()
        .map(|frame| Ok::<_, Infallible>(frame.encode()));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(frames))
        .map_err(|e| Error::internal(format!("Failed to build stream response: {}", e)))
}
