//! Streaming relay state machine
//!
//! ```text
//!   STREAMING --chunk--> STREAMING            (relay chunk verbatim)
//!   STREAMING --sentinel--> TERMINATING       (citations frame, [DONE])
//!   STREAMING --end of stream--> TERMINATING  ([DONE])
//!   STREAMING --read error--> TERMINATING     ([DONE])
//!   TERMINATING --frames drained--> DONE
//! ```
//!
//! The backend stream is read one chunk per emitted frame and dropped as soon
//! as the relay leaves `STREAMING`.

use futures_util::{stream, Stream, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::StreamError;
use crate::providers::ChunkStream;
use crate::types::ChatCompletionChunk;

use super::frame::Frame;
use super::sentinel::SentinelPredicate;

/// Relay progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Reading backend chunks
    Streaming,
    /// Backend released, final frames pending
    Terminating,
    /// Terminal marker sent
    Done,
}

/// Why the relay stopped reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Sentinel,
    EndOfStream,
    TransportError,
}

/// Converts a backend chunk stream into caller frames
pub struct StreamRelay {
    state: RelayState,
    chunks: Option<ChunkStream>,
    sentinel: Arc<dyn SentinelPredicate>,
    model: String,
    citations: String,
    pending: VecDeque<Frame>,
    relayed: usize,
}

impl StreamRelay {
    /// `model` and `citations` feed the trailer frame sent on the sentinel
    pub fn new(
        chunks: ChunkStream,
        sentinel: Arc<dyn SentinelPredicate>,
        model: impl Into<String>,
        citations: impl Into<String>,
    ) -> Self {
        Self {
            state: RelayState::Streaming,
            chunks: Some(chunks),
            sentinel,
            model: model.into(),
            citations: citations.into(),
            pending: VecDeque::with_capacity(2),
            relayed: 0,
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Number of backend chunks relayed so far
    pub fn relayed(&self) -> usize {
        self.relayed
    }

    /// Whether the backend stream is still held
    pub fn holds_backend(&self) -> bool {
        self.chunks.is_some()
    }

    /// Next frame for the caller, `None` once `[DONE]` has been sent
    pub async fn next_frame(&mut self) -> Option<Frame> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                if frame.is_done() {
                    self.state = RelayState::Done;
                }
                return Some(frame);
            }

            if self.state != RelayState::Streaming {
                return None;
            }

            let next = match self.chunks.as_mut() {
                Some(chunks) => chunks.next().await,
                None => None,
            };

            match next {
                Some(Ok(chunk)) if self.sentinel.is_sentinel(&chunk) => {
                    tracing::debug!("Received sentinel chunk, sending citations");
                    self.terminate(Termination::Sentinel);
                }
                Some(Ok(chunk)) => {
                    self.relayed += 1;
                    return Some(Frame::Chunk(chunk.into_payload()));
                }
                None => {
                    tracing::debug!("Completion stream ended without a sentinel");
                    self.terminate(Termination::EndOfStream);
                }
                Some(Err(err)) => {
                    absorb_transport_error(&err);
                    self.terminate(Termination::TransportError);
                }
            }
        }
    }

    /// Consume the relay as a stream of frames
    pub fn into_frames(self) -> impl Stream<Item = Frame> + Send {
        stream::unfold(self, |mut relay| async move {
            relay.next_frame().await.map(|frame| (frame, relay))
        })
    }

    fn terminate(&mut self, reason: Termination) {
        self.chunks = None;
        self.state = RelayState::Terminating;

        if reason == Termination::Sentinel {
            let trailer = ChatCompletionChunk::delta(self.model.as_str(), self.citations.as_str());
            match serde_json::to_string(&trailer) {
                Ok(payload) => self.pending.push_back(Frame::Citations(payload)),
                Err(e) => tracing::warn!("Failed to encode citation frame: {}", e),
            }
        }
        self.pending.push_back(Frame::Done);

        tracing::info!(
            "Relayed {} chunks, terminating stream ({:?})",
            self.relayed,
            reason
        );
    }
}

/// Read failures mid-stream end the caller's stream cleanly with `[DONE]`
/// instead of surfacing an error; OpenAI clients treat a missing marker as a
/// broken response.
fn absorb_transport_error(err: &StreamError) {
    tracing::warn!("Completion stream failed, sending [DONE]: {}", err);
}
