//! Completion relay: forwards the augmented request to the completion
//! backend and delivers its output in the format the caller asked for

pub mod frame;
pub mod sentinel;
pub mod stream;

pub use frame::Frame;
pub use sentinel::{EmptyIdSentinel, SentinelPredicate};
pub use stream::{RelayState, StreamRelay};

use bytes::Bytes;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::{BackendResponse, CompletionBackend};
use crate::types::ChatRequest;

/// Drives the completion backend for one request at a time
#[derive(Clone)]
pub struct CompletionRelay {
    backend: Arc<dyn CompletionBackend>,
    sentinel: Arc<dyn SentinelPredicate>,
}

impl CompletionRelay {
    /// Relay using the empty-id sentinel convention
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            sentinel: Arc::new(EmptyIdSentinel),
        }
    }

    /// Use a different end-of-content signal
    pub fn with_sentinel(mut self, sentinel: Arc<dyn SentinelPredicate>) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Single-shot completion; the backend body is returned verbatim
    pub async fn complete(&self, request: &ChatRequest) -> Result<Bytes> {
        self.backend.chat_completion(request).await.map_err(|e| {
            tracing::error!("Error getting chat completion from {}: {}", self.backend.name(), e);
            e
        })
    }

    /// Open the backend stream and wrap it in a relay that appends
    /// `citations` when the backend signals the end of content
    pub async fn stream(&self, request: &ChatRequest, citations: String) -> Result<StreamRelay> {
        let chunks = self.backend.chat_completion_stream(request).await.map_err(|e| {
            tracing::error!("Error opening completion stream on {}: {}", self.backend.name(), e);
            e
        })?;

        Ok(StreamRelay::new(
            chunks,
            Arc::clone(&self.sentinel),
            request.model.as_str(),
            citations,
        ))
    }

    /// Model listing passthrough
    pub async fn list_models(&self) -> Result<BackendResponse> {
        self.backend.list_models().await
    }
}
