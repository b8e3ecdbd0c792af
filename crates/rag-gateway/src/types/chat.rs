//! OpenAI-style chat completion request types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: ChatRole,
    /// Message text
    #[serde(default)]
    pub content: String,
    /// Keys this gateway does not interpret (`name`, ...), re-emitted as received
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    /// Create a message with no pass-through fields
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Same message attributed to a different author
    pub fn with_role(mut self, role: ChatRole) -> Self {
        self.role = role;
        self
    }
}

/// Chat completion request as sent by the client and forwarded to the backend.
///
/// Only `model`, `messages` and `stream` are interpreted. Every other key
/// (`temperature`, `max_tokens`, `stop`, ...) lands in `extra` and is merged
/// back into the JSON object on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name, forwarded untouched
    pub model: String,
    /// Conversation, oldest first
    pub messages: Vec<ChatMessage>,
    /// Whether the caller wants an event stream
    #[serde(default)]
    pub stream: bool,
    /// Unrecognized request fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    /// Create a non-streaming request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            extra: Map::new(),
        }
    }

    /// Set the stream flag
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Add a pass-through field
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Same request carrying a different conversation
    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// The live turn, used as the retrieval query
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Reject requests the pipeline cannot augment
    pub fn validate(&self) -> Result<()> {
        if self.messages.is_empty() {
            return Err(Error::invalid_request("messages must not be empty"));
        }
        Ok(())
    }
}
