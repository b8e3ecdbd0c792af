//! Fake backends shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use std::sync::{Arc, Mutex};

use rag_gateway::{
    config::GatewayConfig,
    error::{Error, Result, RetrievalError, StreamError},
    pipeline::RagPipeline,
    providers::{BackendResponse, ChunkStream, CompletionBackend, SearchBackend},
    server::state::AppState,
    types::{ChatRequest, RetrievedDocument, SearchHits, StreamChunk},
};

pub struct FakeSearch {
    result: std::result::Result<SearchHits, RetrievalError>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn returning(docs: Vec<RetrievedDocument>) -> Arc<Self> {
        Self::returning_hits(SearchHits::from(docs))
    }

    pub fn returning_hits(hits: SearchHits) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(hits),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: RetrievalError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(err),
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SearchBackend for FakeSearch {
    async fn bm25_search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<SearchHits, RetrievalError> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        self.result.clone()
    }

    fn name(&self) -> &str {
        "fake-search"
    }
}

/// Outcome of a non-streaming call
pub enum Completion {
    Body(&'static str),
    Status(u16, &'static str),
}

pub struct FakeCompletion {
    completion: Completion,
    chunks: Vec<std::result::Result<StreamChunk, StreamError>>,
    models: BackendResponse,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl FakeCompletion {
    pub fn new() -> Self {
        Self {
            completion: Completion::Body(
                r#"{"id":"chatcmpl-1","object":"chat.completion","choices":[]}"#,
            ),
            chunks: Vec::new(),
            models: BackendResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: Bytes::from_static(br#"{"object":"list","data":[{"id":"mpt-7b"}]}"#),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    pub fn with_chunks(
        mut self,
        chunks: Vec<std::result::Result<StreamChunk, StreamError>>,
    ) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn with_models(mut self, status: u16, body: &'static str) -> Self {
        self.models = BackendResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: Bytes::from_static(body.as_bytes()),
        };
        self
    }

    pub fn last_request(&self) -> ChatRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request reached the completion backend")
    }
}

#[async_trait]
impl CompletionBackend for FakeCompletion {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<Bytes> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.completion {
            Completion::Body(body) => Ok(Bytes::from_static(body.as_bytes())),
            Completion::Status(status, body) => Err(Error::CompletionBackend {
                status: *status,
                body: body.to_string(),
            }),
        }
    }

    async fn chat_completion_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        self.requests.lock().unwrap().push(request.clone());
        if let Completion::Status(status, body) = &self.completion {
            return Err(Error::CompletionBackend {
                status: *status,
                body: body.to_string(),
            });
        }
        Ok(Box::pin(stream::iter(self.chunks.clone())))
    }

    async fn list_models(&self) -> Result<BackendResponse> {
        Ok(self.models.clone())
    }

    fn name(&self) -> &str {
        "fake-completion"
    }
}

pub fn chunk(id: &str, content: &str) -> std::result::Result<StreamChunk, StreamError> {
    StreamChunk::parse(format!(
        r#"{{"id":"{}","object":"chat.completion.chunk","model":"mpt-7b","choices":[{{"index":0,"delta":{{"content":"{}"}}}}]}}"#,
        id, content
    ))
}

pub fn doc(content: &str, source: &str, score: f64) -> RetrievedDocument {
    RetrievedDocument::new(content, source, "general", score)
}

/// Pipeline with K=2 and the given threshold
pub fn pipeline(
    search: Arc<FakeSearch>,
    completion: Arc<FakeCompletion>,
    threshold: f64,
) -> RagPipeline {
    RagPipeline::from_backends(search, completion, 2, threshold)
}

pub fn app_state(
    search: Arc<FakeSearch>,
    completion: Arc<FakeCompletion>,
    threshold: f64,
) -> AppState {
    AppState::with_pipeline(
        GatewayConfig::new(threshold),
        pipeline(search, completion, threshold),
    )
}
