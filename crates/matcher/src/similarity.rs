//! Name similarity on a 0–100 scale.
//!
//! A score blends two signals computed over normalized names:
//!
//! - token overlap: shared tokens divided by the size of the larger token
//!   set, so a query that names only the genus does not fully match a
//!   binomial;
//! - string ratio: normalized Levenshtein similarity of the whole strings,
//!   which absorbs single-letter typos the token signal misses.
//!
//! Every function here is total. Empty names score 0 against anything.

use std::collections::BTreeSet;

use canonical::CanonicalName;

pub const TOKEN_WEIGHT: f64 = 0.7;
pub const RATIO_WEIGHT: f64 = 0.3;
pub const MAX_SCORE: f64 = 100.0;

/// `|a ∩ b| / max(|a|, |b|)`, or 0 when either set is empty.
pub fn token_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let larger = a.len().max(b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f64 / larger as f64
}

/// Normalized edit-distance similarity in `[0, 1]`.
pub fn string_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Scores two prepared names.
pub fn score_names(a: &CanonicalName, b: &CanonicalName) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.as_str() == b.as_str() {
        return MAX_SCORE;
    }

    let overlap = token_overlap(a.tokens(), b.tokens());
    let ratio = string_ratio(a.as_str(), b.as_str());
    ((overlap * TOKEN_WEIGHT + ratio * RATIO_WEIGHT) * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

/// Scores two raw names, normalizing both first.
pub fn score(a: &str, b: &str) -> f64 {
    score_names(&CanonicalName::new(a), &CanonicalName::new(b))
}
