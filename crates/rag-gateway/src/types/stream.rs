//! Streamed completion chunk types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StreamError;

/// One chunk of a streamed completion as received from the backend.
///
/// The payload is kept byte-for-byte so it can be relayed verbatim; only the
/// identifier is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    id: Option<String>,
    payload: String,
}

#[derive(Deserialize)]
struct ChunkHeader {
    #[serde(default)]
    id: Option<String>,
}

impl StreamChunk {
    /// Decode the identifier of a `data:` payload
    pub fn parse(payload: impl Into<String>) -> Result<Self, StreamError> {
        let payload = payload.into();
        let value: serde_json::Value = serde_json::from_str(&payload)
            .map_err(|e| StreamError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(StreamError::Malformed(format!(
                "expected a JSON object, got: {}",
                payload
            )));
        }
        let header: ChunkHeader =
            serde_json::from_value(value).map_err(|e| StreamError::Malformed(e.to_string()))?;

        Ok(Self {
            id: header.id,
            payload,
        })
    }

    /// Chunk identifier, `None` when the backend omitted the field
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Raw JSON as received
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn into_payload(self) -> String {
        self.payload
    }
}

/// Synthetic completion delta, used for the citation trailer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    pub content: String,
}

impl ChatCompletionChunk {
    /// Single-choice delta carrying `content`, stamped with a fresh id
    pub fn delta(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            // chatbot-ui keys off this object name rather than "chat.completion.chunk"
            object: "chat.completion".to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model.into(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta {
                    content: content.into(),
                },
                finish_reason: None,
            }],
        }
    }
}
