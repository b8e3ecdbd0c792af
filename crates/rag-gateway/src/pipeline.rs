//! Request pipeline: retrieve, filter, augment, relay

use bytes::Bytes;
use std::sync::Arc;

use crate::error::Result;
use crate::generation::MessageAugmenter;
use crate::providers::{BackendResponse, CompletionBackend, SearchBackend};
use crate::relay::{CompletionRelay, SentinelPredicate, StreamRelay};
use crate::retrieval::RetrievalClient;
use crate::types::ChatRequest;

/// A request rewritten with retrieved context
#[derive(Debug, Clone)]
pub struct PreparedChat {
    /// Request to forward to the completion backend
    pub request: ChatRequest,
    /// Sources of the injected documents, newline separated
    pub citations: String,
    /// Number of documents injected
    pub documents: usize,
}

/// What the caller receives
pub enum ChatOutcome {
    /// Backend response body for a non-streaming request
    Completion(Bytes),
    /// Frames for a streaming request
    Stream(StreamRelay),
}

/// The gateway's request pipeline.
///
/// Holds the backend handles for the life of the process; each request runs
/// through it independently.
#[derive(Clone)]
pub struct RagPipeline {
    retrieval: RetrievalClient,
    relay: CompletionRelay,
}

impl RagPipeline {
    pub fn new(retrieval: RetrievalClient, relay: CompletionRelay) -> Self {
        Self { retrieval, relay }
    }

    /// Build the pipeline from backend handles and retrieval settings
    pub fn from_backends(
        search: Arc<dyn SearchBackend>,
        completion: Arc<dyn CompletionBackend>,
        query_count: usize,
        score_threshold: f64,
    ) -> Self {
        Self::new(
            RetrievalClient::new(search, query_count, score_threshold),
            CompletionRelay::new(completion),
        )
    }

    /// Use a different end-of-content signal for streamed completions
    pub fn with_sentinel(mut self, sentinel: Arc<dyn SentinelPredicate>) -> Self {
        self.relay = self.relay.with_sentinel(sentinel);
        self
    }

    pub fn retrieval(&self) -> &RetrievalClient {
        &self.retrieval
    }

    /// Retrieve documents for the live turn and rewrite the conversation
    pub async fn prepare(&self, request: ChatRequest) -> Result<PreparedChat> {
        request.validate()?;

        let query = request
            .last_message()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let docs = self.retrieval.query(&query).await?;
        for doc in &docs {
            tracing::debug!(
                "Context from {} ({}): score {}",
                doc.source,
                doc.channel,
                doc.relevance_score
            );
        }

        let documents = docs.len();
        let (request, citations) = MessageAugmenter::augment_request(request, &docs);

        if documents > 0 {
            tracing::info!("Injected {} documents, citing:\n{}", documents, citations);
        } else {
            tracing::info!("No documents above threshold, forwarding request unchanged");
        }

        Ok(PreparedChat {
            request,
            citations,
            documents,
        })
    }

    /// Run the full pipeline for one chat request
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatOutcome> {
        let prepared = self.prepare(request).await?;

        if prepared.request.stream {
            let relay = self.relay.stream(&prepared.request, prepared.citations).await?;
            Ok(ChatOutcome::Stream(relay))
        } else {
            let body = self.relay.complete(&prepared.request).await?;
            Ok(ChatOutcome::Completion(body))
        }
    }

    /// Model listing passthrough
    pub async fn list_models(&self) -> Result<BackendResponse> {
        self.relay.list_models().await
    }
}
