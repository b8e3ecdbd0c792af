//! rag-gateway: retrieval-augmented chat completion gateway
//!
//! Sits between an OpenAI-style chat client and two backends: a keyword
//! search service holding indexed documents and an OpenAI-compatible
//! completion service. Each chat request is augmented with the documents that
//! score above a relevance threshold, forwarded to the completion backend, and
//! relayed back (as JSON or an event stream) with the sources cited at the end.

pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod relay;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::GatewayConfig;
pub use error::{Error, Result, RetrievalError, StreamError};
pub use pipeline::{ChatOutcome, PreparedChat, RagPipeline};
pub use types::{
    chat::{ChatMessage, ChatRequest, ChatRole},
    document::{FilteredDocumentSet, RetrievedDocument},
    stream::StreamChunk,
};
