//! Token-set similarity on a 0–100 scale.
//!
//! Tokens are whitespace-separated and compared as sets, so word order and
//! repeated words do not affect the score. Built on `rapidfuzz::fuzz::ratio`
//! (normalized Indel similarity, 0.0–1.0).

use std::collections::BTreeSet;

/// Order-invariant token overlap score in `0.0..=100.0`.
///
/// With `I` the sorted intersection and `A`, `B` the sorted differences:
/// - either side has no tokens → 0
/// - a non-empty intersection with one difference empty → 100 (subset)
/// - otherwise the best of `ratio(I+A, I+B)`, `ratio(I, I+A)`, `ratio(I, I+B)`
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_score = ratio(&diff_ab, &diff_ba);
    if intersection.is_empty() {
        return diff_score;
    }

    let with_ab = format!("{intersection} {diff_ab}");
    let with_ba = format!("{intersection} {diff_ba}");

    diff_score
        .max(ratio(&intersection, &with_ab))
        .max(ratio(&intersection, &with_ba))
}

fn ratio(a: &str, b: &str) -> f64 {
    rapidfuzz::fuzz::ratio(a.chars(), b.chars()) * 100.0
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}
