//! Incremental decoder for `text/event-stream` bodies
//!
//! OpenAI-compatible backends send one `data: {json}` line per chunk and a
//! final `data: [DONE]`. Network reads split lines arbitrarily, so bytes are
//! buffered until a full line is available.

/// Payload marker that ends an OpenAI-style stream
pub const DONE_MARKER: &str = "[DONE]";

/// A decoded server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` line carrying a payload
    Data(String),
    /// The `data: [DONE]` marker
    Done,
}

/// Line-oriented event-stream decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes read from the transport
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete event, skipping comments, blank lines and non-data fields
    pub fn next_event(&mut self) -> Option<SseEvent> {
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = decode_line(&line[..line.len() - 1]) {
                return Some(event);
            }
        }
        None
    }

    /// Decode whatever is left once the transport has closed
    pub fn finish(&mut self) -> Option<SseEvent> {
        if let Some(event) = self.next_event() {
            return Some(event);
        }
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

fn decode_line(line: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches('\r');

    let value = line.strip_prefix("data:")?;
    let payload = value.strip_prefix(' ').unwrap_or(value).trim();

    match payload {
        "" => None,
        DONE_MARKER => Some(SseEvent::Done),
        _ => Some(SseEvent::Data(payload.to_string())),
    }
}
