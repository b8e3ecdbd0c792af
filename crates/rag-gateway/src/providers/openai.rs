//! OpenAI-compatible completion client

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, Stream, StreamExt};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use std::pin::Pin;
use std::time::Duration;

use crate::config::CompletionConfig;
use crate::error::{Error, Result, StreamError};
use crate::types::{ChatRequest, StreamChunk};

use super::completion::{BackendResponse, ChunkStream, CompletionBackend};
use super::sse::{SseDecoder, SseEvent};

/// Client for `/chat/completions` and `/models`
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: CompletionConfig,
}

impl OpenAiClient {
    /// Create a new completion client
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create completion HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<Response> {
        let url = self.config.endpoint("chat/completions");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::completion(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::CompletionBackend { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<Bytes> {
        tracing::info!("Requesting completion from model: {}", request.model);

        let response = self.post_chat(request).await?;
        response
            .bytes()
            .await
            .map_err(|e| Error::completion(format!("Failed to read completion response: {}", e)))
    }

    async fn chat_completion_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        tracing::info!("Opening completion stream for model: {}", request.model);

        let response = self.post_chat(request).await?;
        Ok(Box::pin(decode_chunks(response.bytes_stream())))
    }

    async fn list_models(&self) -> Result<BackendResponse> {
        let url = self.config.endpoint("models");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| Error::completion(format!("Model listing failed: {}", e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    decoder: SseDecoder,
    finished: bool,
}

/// Turn an event-stream body into completion chunks.
///
/// `data: [DONE]` and transport close both end the stream. A read failure is
/// yielded once, after which the stream ends.
pub fn decode_chunks<S, E>(
    bytes: S,
) -> impl Stream<Item = std::result::Result<StreamChunk, StreamError>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send,
    E: std::fmt::Display + Send,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            if let Some(event) = state.decoder.next_event() {
                return match event {
                    SseEvent::Done => None,
                    SseEvent::Data(payload) => Some((StreamChunk::parse(payload), state)),
                };
            }

            match state.bytes.next().await {
                Some(Ok(bytes)) => state.decoder.push(&bytes),
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(StreamError::Transport(e.to_string())), state));
                }
                None => {
                    state.finished = true;
                    return match state.decoder.finish() {
                        Some(SseEvent::Data(payload)) => Some((StreamChunk::parse(payload), state)),
                        Some(SseEvent::Done) | None => None,
                    };
                }
            }
        }
    })
}
