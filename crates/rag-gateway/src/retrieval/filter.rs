//! Relevance score filtering

use crate::types::{FilteredDocumentSet, RetrievedDocument};

/// Keeps candidates scoring strictly above a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFilter {
    threshold: f64,
}

impl ScoreFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Retain candidates with `relevance_score > threshold`, keeping the
    /// backend's ranking order.
    ///
    /// A score equal to the threshold is dropped.
    pub fn filter(&self, candidates: Vec<RetrievedDocument>) -> FilteredDocumentSet {
        tracing::debug!(
            "Filtering {} search results, threshold is {}",
            candidates.len(),
            self.threshold
        );

        let retained = candidates
            .into_iter()
            .filter(|doc| {
                let keep = doc.relevance_score > self.threshold;
                if !keep {
                    tracing::debug!(
                        "Skipping search result from {} with score {}",
                        doc.source,
                        doc.relevance_score
                    );
                }
                keep
            })
            .collect();

        FilteredDocumentSet::from_ranked(retained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(source: &str, score: f64) -> RetrievedDocument {
        RetrievedDocument::new(format!("content of {}", source), source, "general", score)
    }

    #[test]
    fn test_score_equal_to_threshold_is_dropped() {
        let filtered = ScoreFilter::new(3.0).filter(vec![doc("a", 3.0), doc("b", 3.0001)]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.documents()[0].source, "b");
    }

    #[test]
    fn test_order_is_preserved_not_sorted() {
        let filtered =
            ScoreFilter::new(1.0).filter(vec![doc("low", 2.0), doc("high", 9.0), doc("mid", 5.0)]);
        let sources: Vec<_> = filtered.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["low", "high", "mid"]);
    }

    #[test]
    fn test_empty_and_all_below() {
        let filter = ScoreFilter::new(5.0);
        assert!(filter.filter(vec![]).is_empty());
        assert!(filter.filter(vec![doc("a", 1.0), doc("b", 4.9)]).is_empty());
    }

    #[test]
    fn test_scenario_two_candidates() {
        let filtered = ScoreFilter::new(3.0).filter(vec![doc("s1", 5.0), doc("s2", 2.0)]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.documents()[0].source, "s1");
    }

    proptest! {
        #[test]
        fn prop_filter_is_ordered_exact_subset(
            scores in prop::collection::vec(-10.0f64..10.0, 0..20),
            threshold in -10.0f64..10.0,
        ) {
            let candidates: Vec<_> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| doc(&i.to_string(), *s))
                .collect();
            let expected: Vec<_> = candidates
                .iter()
                .filter(|d| d.relevance_score > threshold)
                .cloned()
                .collect();

            let filtered = ScoreFilter::new(threshold).filter(candidates);

            prop_assert_eq!(filtered.documents(), expected.as_slice());
            prop_assert!(filtered.iter().all(|d| d.relevance_score > threshold));
        }
    }
}
