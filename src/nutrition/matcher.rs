//! Free-text food matching
//!
//! Scores every catalog key against the user's text and picks the best one.
//! Scores are a ranking signal only; they have no fixed range.

use serde::Serialize;

use super::catalog::FoodCatalog;

/// Score of an exact (case-insensitive) match
pub const EXACT_SCORE: f64 = 100.0;
/// Score when one string contains the other
pub const CONTAINS_SCORE: f64 = 90.0;
/// Points per query token also present in the key
pub const TOKEN_OVERLAP_POINTS: f64 = 20.0;
/// Penalty per character of length difference
pub const LENGTH_PENALTY: f64 = 0.5;
/// A key must score strictly above this to be accepted
pub const ACCEPTANCE_FLOOR: f64 = -1.0;

/// Outcome of matching one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub key: Option<String>,
    pub confidence: f64,
}

/// A scored candidate, used for ranked listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredKey {
    pub key: String,
    pub score: f64,
}

/// Similarity of `query` to catalog key `key`
pub fn score(query: &str, key: &str) -> f64 {
    let query = query.to_lowercase();
    let key = key.to_lowercase();

    if query == key {
        return EXACT_SCORE;
    }
    if key.contains(&query) || query.contains(&key) {
        return CONTAINS_SCORE;
    }

    let key_tokens: Vec<&str> = key.split_whitespace().collect();
    let overlap = query
        .split_whitespace()
        .filter(|t| key_tokens.contains(t))
        .count();

    let length_diff = query.chars().count().abs_diff(key.chars().count());

    overlap as f64 * TOKEN_OVERLAP_POINTS - LENGTH_PENALTY * length_diff as f64
}

/// Best-scoring key for `query`, first key wins ties.
///
/// `confidence` holds the best score seen even when nothing was accepted,
/// and the floor itself for an empty catalog.
pub fn best_match(catalog: &FoodCatalog, query: &str) -> MatchResult {
    let mut best_key: Option<&str> = None;
    let mut best = ACCEPTANCE_FLOOR;
    let mut highest_seen: Option<f64> = None;

    for key in catalog.keys() {
        let s = score(query, key);
        if s > best {
            best = s;
            best_key = Some(key);
        }
        highest_seen = Some(highest_seen.map_or(s, |h| h.max(s)));
    }

    match best_key {
        Some(key) => MatchResult {
            key: Some(key.to_string()),
            confidence: best,
        },
        None => MatchResult {
            key: None,
            confidence: highest_seen.unwrap_or(ACCEPTANCE_FLOOR),
        },
    }
}

/// Matched key only
pub fn match_key(catalog: &FoodCatalog, query: &str) -> Option<String> {
    best_match(catalog, query).key
}

/// Top `limit` candidates, best first; equal scores keep catalog order
pub fn rank(catalog: &FoodCatalog, query: &str, limit: usize) -> Vec<ScoredKey> {
    let mut scored: Vec<ScoredKey> = catalog
        .keys()
        .map(|key| ScoredKey {
            key: key.to_string(),
            score: score(query, key),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::catalog::{default_catalog, FoodRecord};
    use crate::nutrition::units::UnitKind;

    fn catalog_of(keys: &[&str]) -> FoodCatalog {
        FoodCatalog::from_entries(
            keys.iter()
                .map(|k| (*k, FoodRecord::new(100.0, 1.0, UnitKind::PerPiece))),
        )
        .unwrap()
    }

    #[test]
    fn test_score_exact() {
        assert_eq!(score("Egg", "egg"), EXACT_SCORE);
    }

    #[test]
    fn test_score_contains_either_way() {
        assert_eq!(score("chicken", "chicken breast"), CONTAINS_SCORE);
        assert_eq!(score("grilled chicken breast", "chicken breast"), CONTAINS_SCORE);
        assert_eq!(score("", "egg"), CONTAINS_SCORE);
    }

    #[test]
    fn test_score_token_overlap_with_length_penalty() {
        // "rice" matches; 15 vs 11 chars
        assert_eq!(score("rice fried well", "rice cooked"), 20.0 - 2.0);
        // no overlap at all
        assert_eq!(score("tea", "salmon"), -1.5);
    }

    #[test]
    fn test_score_counts_repeated_query_tokens() {
        assert_eq!(score("toast toast", "toast bread"), 40.0);
    }

    #[test]
    fn test_score_counts_lowercased_chars() {
        // 'İ' lowercases to 'i' plus a combining dot, so the query is 7 chars
        assert_eq!(score("İÇ 🍕\t\n", "spinach"), 0.0);
        assert_eq!(score("İÇ 🍕\t\n", "banana"), -0.5);
    }

    #[test]
    fn test_exotic_unicode_query_still_matches() {
        let result = best_match(default_catalog(), "İÇ 🍕\t\n");
        assert_eq!(result.key.as_deref(), Some("spinach"));
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_repeated_spaces_fall_back_to_token_overlap() {
        // both tokens overlap, 16 vs 14 chars
        let result = best_match(default_catalog(), "chicken   breast");
        assert_eq!(result.key.as_deref(), Some("chicken breast"));
        assert_eq!(result.confidence, 39.0);
    }

    #[test]
    fn test_exact_match() {
        let result = best_match(default_catalog(), "egg");
        assert_eq!(result.key.as_deref(), Some("egg"));
        assert_eq!(result.confidence, EXACT_SCORE);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(
            match_key(default_catalog(), "chicken").as_deref(),
            Some("chicken breast")
        );
    }

    #[test]
    fn test_case_insensitive_query() {
        assert_eq!(match_key(default_catalog(), "GREEK Yogurt").as_deref(), Some("greek yogurt"));
    }

    #[test]
    fn test_tie_break_prefers_earlier_key() {
        let catalog = catalog_of(&["rice cooked", "brown rice cooked"]);
        // "rice" is contained in both
        for _ in 0..3 {
            let result = best_match(&catalog, "rice");
            assert_eq!(result.key.as_deref(), Some("rice cooked"));
            assert_eq!(result.confidence, CONTAINS_SCORE);
        }

        let reversed = catalog_of(&["brown rice cooked", "rice cooked"]);
        assert_eq!(match_key(&reversed, "rice").as_deref(), Some("brown rice cooked"));
    }

    #[test]
    fn test_exact_beats_earlier_substring() {
        let catalog = catalog_of(&["greek yogurt", "yogurt"]);
        assert_eq!(match_key(&catalog, "yogurt").as_deref(), Some("yogurt"));
    }

    #[test]
    fn test_empty_query_matches_first_key() {
        let result = best_match(default_catalog(), "");
        assert_eq!(result.key.as_deref(), Some("chicken breast"));
        assert_eq!(result.confidence, CONTAINS_SCORE);
    }

    #[test]
    fn test_poor_match_above_floor_is_returned() {
        // one char longer than "chicken breast": -0.5
        let result = best_match(default_catalog(), "unobtainium bar");
        assert_eq!(result.key.as_deref(), Some("chicken breast"));
        assert!(result.confidence < 0.0);
    }

    #[test]
    fn test_nothing_above_floor_is_unresolved() {
        let catalog = catalog_of(&["egg", "milk"]);
        let result = best_match(&catalog, "unobtainium bar");
        assert_eq!(result.key, None);
        // "milk" is the closer of the two
        assert_eq!(result.confidence, -5.5);
    }

    #[test]
    fn test_empty_catalog_never_matches() {
        let catalog = FoodCatalog::empty();
        let result = best_match(&catalog, "egg");
        assert_eq!(result.key, None);
        assert_eq!(result.confidence, ACCEPTANCE_FLOOR);
        assert_eq!(match_key(&catalog, ""), None);
    }

    #[test]
    fn test_rank_orders_by_score_then_catalog_order() {
        let ranked = rank(default_catalog(), "yogurt", 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].key, "yogurt");
        assert_eq!(ranked[0].score, EXACT_SCORE);
        assert_eq!(ranked[1].key, "greek yogurt");
        assert_eq!(ranked[1].score, CONTAINS_SCORE);
    }

    #[test]
    fn test_rank_limit() {
        assert!(rank(default_catalog(), "egg", 0).is_empty());
        assert_eq!(rank(default_catalog(), "egg", 100).len(), default_catalog().len());
    }
}
