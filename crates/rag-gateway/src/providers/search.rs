//! Keyword search provider trait

use async_trait::async_trait;

use crate::error::RetrievalError;
use crate::types::SearchHits;

/// Trait for BM25-style keyword search over the indexed documents
///
/// Implementations:
/// - `WeaviateClient`: Weaviate GraphQL `Get` with a `bm25` argument
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search for `query`, returning at most `limit` candidates in ranking order.
    ///
    /// `SearchHits::rows` is zero only when the backend answered with no rows.
    async fn bm25_search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<SearchHits, RetrievalError>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
