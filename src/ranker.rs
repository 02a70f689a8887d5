//! Heuristic fuzzy ranker
//!
//! Scores a catalog against a partially typed keyword and keeps the top K
//! matches. The heuristic is deliberately biased toward prefix and token
//! matches, which is what identifier-style values and short natural
//! language descriptions want; it is not an edit-distance metric.
//!
//! The weight constants are a behavioral contract, not tuning knobs:
//! downstream ordering guarantees (an exact value match always beats a
//! prefix match, which always beats a description-only match) depend on
//! their relative magnitudes. The inverse-length bonus uses the matched
//! token's length, so shorter, tighter tokens rank higher; entries with
//! equal scores keep catalog order.

use crate::catalog::Candidate;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Score added per description token that starts with the keyword.
pub const DESC_TOKEN_WEIGHT: f64 = 1.0;
/// Score added per value token (split on `_`) that starts with the keyword.
pub const VALUE_TOKEN_WEIGHT: f64 = 3.0;
/// Score added when the whole value starts with the keyword.
pub const VALUE_PREFIX_WEIGHT: f64 = 5.0;
/// Score added when the value equals the keyword; dominates everything else.
pub const EXACT_MATCH_WEIGHT: f64 = 10.0;

/// Maximum number of ranked results returned.
pub const MAX_RESULTS: usize = 10;

/// Score one candidate against a lower-cased keyword. Zero means no match.
pub fn score(candidate: &Candidate, keyword: &str) -> f64 {
    let value = candidate.value.replace('"', "").to_lowercase();
    let description = candidate.description.replace('"', "").to_lowercase();

    let mut score = 0.0;
    for token in description.split(' ').filter(|t| !t.is_empty()) {
        if token.starts_with(keyword) {
            score += DESC_TOKEN_WEIGHT + 1.0 / token.len() as f64;
        }
    }
    for token in value.split('_').filter(|t| !t.is_empty()) {
        if token.starts_with(keyword) {
            score += VALUE_TOKEN_WEIGHT + 1.0 / token.len() as f64;
        }
    }
    if value.starts_with(keyword) {
        score += VALUE_PREFIX_WEIGHT;
    }
    if value == keyword {
        score += EXACT_MATCH_WEIGHT;
    }
    score
}

/// Heap entry ordered "better first": higher score, then earlier catalog
/// index. Wrapped in `Reverse` below so the heap minimum is the worst
/// retained candidate.
#[derive(Debug, PartialEq)]
struct Scored {
    score: f64,
    index: usize,
}

impl Eq for Scored {}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank `catalog` against `keyword`, returning at most [`MAX_RESULTS`]
/// candidates, best first. Zero-score entries are dropped. The catalog is
/// scanned once with a bounded min-heap, O(N log K).
pub fn rank<'a>(catalog: &'a [Candidate], keyword: &str) -> Vec<&'a Candidate> {
    let keyword = keyword.to_lowercase();
    let mut heap: BinaryHeap<std::cmp::Reverse<Scored>> = BinaryHeap::with_capacity(MAX_RESULTS);

    for (index, candidate) in catalog.iter().enumerate() {
        let score = score(candidate, &keyword);
        if score <= 0.0 {
            continue;
        }
        if heap.len() < MAX_RESULTS {
            heap.push(std::cmp::Reverse(Scored { score, index }));
        } else if let Some(min) = heap.peek() {
            // Replace the worst retained entry only on a strictly better
            // score; equal scores keep the earlier catalog entry.
            if score > min.0.score {
                heap.pop();
                heap.push(std::cmp::Reverse(Scored { score, index }));
            }
        }
    }

    let mut results: Vec<Scored> = heap.into_iter().map(|r| r.0).collect();
    results.sort_by(|a, b| b.cmp(a));
    results.into_iter().map(|s| &catalog[s.index]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(entries: &[(&str, &str)]) -> Vec<Candidate> {
        entries
            .iter()
            .map(|(v, d)| Candidate::new(*v, *d))
            .collect()
    }

    #[test]
    fn test_exact_match_outranks_prefix_match() {
        let catalog = catalog(&[("net_income_growth", "Net Income Growth"), ("net", "Net")]);
        let ranked = rank(&catalog, "net");
        assert_eq!(ranked[0].value, "net");
        assert_eq!(ranked[1].value, "net_income_growth");
    }

    #[test]
    fn test_prefix_match_outranks_description_match() {
        let catalog = catalog(&[
            ("total_revenue", "Revenue Total"),
            ("revenue", "Top line"),
        ]);
        let ranked = rank(&catalog, "rev");
        assert_eq!(ranked[0].value, "revenue");
        assert_eq!(ranked[1].value, "total_revenue");
    }

    #[test]
    fn test_zero_score_entries_are_excluded() {
        let catalog = catalog(&[
            ("net_income", "Net Income"),
            ("net_ppe", "Net PPE"),
            ("total_revenue", "Total Revenue"),
        ]);
        let ranked = rank(&catalog, "net");
        let values: Vec<&str> = ranked.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["net_income", "net_ppe"]);
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        // Same tokens, same lengths: identical scores for "net".
        let catalog = catalog(&[("net_income", "Net Income"), ("net_profit", "Net Profit")]);
        let ranked = rank(&catalog, "net");
        assert_eq!(ranked[0].value, "net_income");
        assert_eq!(ranked[1].value, "net_profit");
    }

    #[test]
    fn test_result_length_is_bounded() {
        let entries: Vec<Candidate> = (0..100)
            .map(|i| Candidate::new(format!("metric_{i}"), "Metric"))
            .collect();
        let ranked = rank(&entries, "metric");
        assert_eq!(ranked.len(), MAX_RESULTS);
    }

    #[test]
    fn test_keyword_case_is_ignored() {
        let catalog = catalog(&[("net_income", "Net Income")]);
        assert_eq!(rank(&catalog, "NET").len(), 1);
    }

    #[test]
    fn test_shorter_token_scores_higher() {
        let a = Candidate::new("roe", "Return on Equity");
        let b = Candidate::new("roe_growth", "Return on Equity Growth");
        assert!(score(&a, "roe") > score(&b, "roe"));
    }

    #[test]
    fn test_quotes_are_stripped_before_matching() {
        let catalog = catalog(&[("\"my list\"", "")]);
        assert_eq!(rank(&catalog, "my").len(), 1);
    }
}
