//! End-of-content detection for streamed completions

use crate::types::StreamChunk;

/// Decides whether a chunk marks the end of generated content.
///
/// Some backends keep the transport open after the last content chunk and
/// signal completion in-band instead; implementations encode that signal.
pub trait SentinelPredicate: Send + Sync {
    fn is_sentinel(&self, chunk: &StreamChunk) -> bool;
}

/// LeapfrogAI convention: a chunk with an empty (or absent) `id`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyIdSentinel;

impl SentinelPredicate for EmptyIdSentinel {
    fn is_sentinel(&self, chunk: &StreamChunk) -> bool {
        chunk.id().map_or(true, str::is_empty)
    }
}
