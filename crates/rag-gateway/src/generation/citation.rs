//! Citation trailer for the retrieved sources

use crate::types::FilteredDocumentSet;

/// Sources of the retained documents, one per line, in retrieval order.
/// Empty when nothing was retained.
pub fn citation_suffix(docs: &FilteredDocumentSet) -> String {
    docs.iter()
        .map(|d| d.source.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
