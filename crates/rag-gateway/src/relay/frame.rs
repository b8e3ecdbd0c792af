//! Event-stream frames sent to the caller

use bytes::Bytes;

use crate::providers::sse::DONE_MARKER;

/// One event frame of the relayed stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A backend chunk, verbatim
    Chunk(String),
    /// The synthetic delta carrying the citation suffix
    Citations(String),
    /// The terminal marker
    Done,
}

impl Frame {
    /// JSON payload (or the `[DONE]` marker) carried by this frame
    pub fn payload(&self) -> &str {
        match self {
            Frame::Chunk(payload) | Frame::Citations(payload) => payload,
            Frame::Done => DONE_MARKER,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Frame::Done)
    }

    /// Wire encoding: `data:`, one space, the payload, a blank line.
    ///
    /// OpenAI clients expect the space between the field name and the
    /// payload, and chatbot-ui breaks without it.
    pub fn encode(&self) -> Bytes {
        let payload = self.payload();
        let mut frame = String::with_capacity(payload.len() + 8);
        frame.push_str("data:");
        frame.push(' ');
        frame.push_str(payload);
        frame.push_str("\n\n");
        Bytes::from(frame)
    }
}
