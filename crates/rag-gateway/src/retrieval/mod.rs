//! Document retrieval: keyword search and relevance filtering

pub mod client;
pub mod filter;

pub use client::RetrievalClient;
pub use filter::ScoreFilter;
