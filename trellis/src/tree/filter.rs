//! Ready-made tree filters.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use super::config::TreeFilter;

/// Fuzzy match score of `label` against `query` (higher is better).
///
/// An empty query matches everything with score 0.
pub fn fuzzy_score(query: &str, label: &str) -> Option<u32> {
    if query.is_empty() {
        return Some(0);
    }
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf = Vec::new();
    pattern.score(Utf32Str::new(label, &mut buf), &mut matcher)
}

impl TreeFilter {
    /// Keep nodes whose label fuzzy-matches `query`.
    pub fn fuzzy(query: impl Into<String>) -> Self {
        let query = query.into();
        if query.is_empty() {
            return Self::new(|_| true);
        }
        let pattern = Pattern::new(
            &query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        Self::new(move |node| {
            let mut matcher = Matcher::new(Config::DEFAULT);
            let mut buf = Vec::new();
            pattern
                .score(Utf32Str::new(&node.label, &mut buf), &mut matcher)
                .is_some()
        })
    }

    /// Keep nodes whose label contains `needle` (case-sensitive).
    pub fn label_contains(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        Self::new(move |node| node.label.contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_score_empty_query() {
        assert_eq!(fuzzy_score("", "anything"), Some(0));
    }

    #[test]
    fn test_fuzzy_score_matches_subsequence() {
        assert!(fuzzy_score("dcs", "Documents").is_some());
        assert!(fuzzy_score("xyz", "Documents").is_none());
    }
}
