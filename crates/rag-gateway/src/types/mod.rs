//! Core types for the gateway

pub mod chat;
pub mod document;
pub mod stream;

pub use chat::{ChatMessage, ChatRequest, ChatRole};
pub use document::{FilteredDocumentSet, RetrievedDocument, SearchHits};
pub use stream::{ChatCompletionChunk, StreamChunk};
