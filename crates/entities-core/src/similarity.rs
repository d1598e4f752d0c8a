//! String similarity primitives
//!
//! Thin wrappers over `strsim`, shared by every engine. The portable module
//! is compiled from this same file, so both engines run the same code.
//!
//! All lengths are counted in Unicode scalar values, not bytes.

/// Levenshtein distance: minimum number of single-character insertions,
/// deletions and substitutions turning `a` into `b`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Edit distance normalized to `[0, 1]`, where 1 means identical.
///
/// `1 - d / max(|a|, |b|)`; two empty strings score 1.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Jaro-Winkler similarity in `[0, 1]`.
///
/// Identical strings score 1 and strings without a single matching
/// character score 0. The prefix bonus (capped at 4 characters, factor 0.1)
/// is only granted when the plain Jaro score exceeds 0.7.
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    strsim::jaro_winkler(a, b)
}
