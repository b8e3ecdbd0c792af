//! Provider abstractions for the keyword search and completion backends
//!
//! The pipeline only sees the traits, so either backend can be swapped for
//! another implementation (or a fake in tests).

pub mod completion;
pub mod openai;
pub mod search;
pub mod sse;
pub mod weaviate;

pub use completion::{BackendResponse, ChunkStream, CompletionBackend};
pub use openai::OpenAiClient;
pub use search::SearchBackend;
pub use weaviate::WeaviateClient;
