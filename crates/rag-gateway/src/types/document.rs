//! Retrieved document types

use serde::{Deserialize, Serialize};

/// A candidate returned by the keyword search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Indexed text
    pub content: String,
    /// Where the text came from (link or file name), cited back to the caller
    pub source: String,
    /// Channel the text was indexed from
    pub channel: String,
    /// BM25 relevance score, higher is better
    pub relevance_score: f64,
}

impl RetrievedDocument {
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        channel: impl Into<String>,
        relevance_score: f64,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            channel: channel.into(),
            relevance_score,
        }
    }
}

/// Rows returned by one keyword search.
///
/// `rows` counts every row the backend answered with, including rows that
/// carried no usable score and were left out of `documents`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub rows: usize,
    pub documents: Vec<RetrievedDocument>,
}

impl SearchHits {
    pub fn new(rows: usize, documents: Vec<RetrievedDocument>) -> Self {
        Self { rows, documents }
    }

    /// Backend answered with no rows at all
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Rows dropped for lack of a score
    pub fn unscored(&self) -> usize {
        self.rows.saturating_sub(self.documents.len())
    }
}

impl From<Vec<RetrievedDocument>> for SearchHits {
    fn from(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            rows: documents.len(),
            documents,
        }
    }
}

/// Candidates that passed the score filter, in the backend's ranking order.
///
/// Only [`ScoreFilter`](crate::retrieval::ScoreFilter) builds non-empty sets,
/// so every member is guaranteed to score above the threshold it was
/// filtered with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredDocumentSet {
    documents: Vec<RetrievedDocument>,
}

impl FilteredDocumentSet {
    /// A set with no documents
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_ranked(documents: Vec<RetrievedDocument>) -> Self {
        Self { documents }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn documents(&self) -> &[RetrievedDocument] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RetrievedDocument> {
        self.documents.iter()
    }
}

impl<'a> IntoIterator for &'a FilteredDocumentSet {
    type Item = &'a RetrievedDocument;
    type IntoIter = std::slice::Iter<'a, RetrievedDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
