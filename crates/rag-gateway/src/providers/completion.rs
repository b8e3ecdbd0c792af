//! Completion backend provider trait

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

use crate::error::{Result, StreamError};
use crate::types::{ChatRequest, StreamChunk};

/// Chunks of a streamed completion. Ends when the backend signals the end of
/// the stream or closes the transport.
pub type ChunkStream =
    Pin<Box<dyn Stream<Item = std::result::Result<StreamChunk, StreamError>> + Send>>;

/// Raw backend response relayed without interpretation
#[derive(Debug, Clone)]
pub struct BackendResponse {
    /// HTTP status returned by the backend
    pub status: u16,
    /// `Content-Type` returned by the backend, if any
    pub content_type: Option<String>,
    /// Body bytes as received
    pub body: Bytes,
}

/// Trait for OpenAI-compatible chat completion backends
///
/// Implementations:
/// - `OpenAiClient`: any server exposing `/chat/completions` and `/models`
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Single-shot completion. Returns the response body verbatim on success
    /// and `Error::CompletionBackend` on a non-success status.
    async fn chat_completion(&self, request: &ChatRequest) -> Result<Bytes>;

    /// Open a streamed completion. Errors here happen before any chunk has
    /// been read; failures while reading are items of the returned stream.
    async fn chat_completion_stream(&self, request: &ChatRequest) -> Result<ChunkStream>;

    /// Model listing, passed through with the backend's own status
    async fn list_models(&self) -> Result<BackendResponse>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
