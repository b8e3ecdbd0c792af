//! Retrieval client: keyword search followed by score filtering

use std::sync::Arc;

use crate::error::RetrievalError;
use crate::providers::SearchBackend;
use crate::types::FilteredDocumentSet;

use super::filter::ScoreFilter;

/// Queries the search backend for the live user turn and filters the
/// candidates by relevance
#[derive(Clone)]
pub struct RetrievalClient {
    backend: Arc<dyn SearchBackend>,
    query_count: usize,
    filter: ScoreFilter,
}

impl RetrievalClient {
    /// Create a client requesting `query_count` candidates and keeping those
    /// scoring above `score_threshold`
    pub fn new(backend: Arc<dyn SearchBackend>, query_count: usize, score_threshold: f64) -> Self {
        Self {
            backend,
            query_count,
            filter: ScoreFilter::new(score_threshold),
        }
    }

    pub fn query_count(&self) -> usize {
        self.query_count
    }

    pub fn score_threshold(&self) -> f64 {
        self.filter.threshold()
    }

    /// Search for `text` and filter the results.
    ///
    /// Zero rows from the backend is `RetrievalError::NoData`. Rows that all
    /// fall below the threshold, or carry no usable score, give an empty set,
    /// which is not an error.
    pub async fn query(&self, text: &str) -> Result<FilteredDocumentSet, RetrievalError> {
        let hits = self
            .backend
            .bm25_search(text, self.query_count)
            .await
            .map_err(|e| {
                tracing::error!("Error querying {}: {}", self.backend.name(), e);
                e
            })?;

        if hits.is_empty() {
            tracing::warn!("{} returned no rows", self.backend.name());
            return Err(RetrievalError::NoData);
        }
        if hits.unscored() > 0 {
            tracing::debug!("Skipped {} rows without a score", hits.unscored());
        }

        let total = hits.rows;
        let filtered = self.filter.filter(hits.documents);

        tracing::info!(
            "Retrieved {} rows, {} above threshold {}",
            total,
            filtered.len(),
            self.filter.threshold()
        );

        Ok(filtered)
    }
}
