//! Token-window candidate generation
//!
//! A synonym of `k` tokens is only compared against spans of `k - 1`, `k`
//! and `k + 1` tokens, each width clamped to `1..=n`. One dropped or inserted
//! word is tolerated while the search stays linear in the text length.

use std::collections::BTreeSet;

/// A token span considered for one synonym of one value.
///
/// Indices point into the compiled definition; `first_token..end_token` is a
/// half-open token range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub value: usize,
    pub synonym: usize,
    pub first_token: usize,
    pub end_token: usize,
}

impl Candidate {
    /// Width in tokens
    pub fn width(&self) -> usize {
        self.end_token - self.first_token
    }

    pub fn overlaps(&self, other: &Candidate) -> bool {
        self.first_token < other.end_token && other.first_token < self.end_token
    }
}

/// Allowed window widths for a synonym of `synonym_tokens` tokens over a
/// text of `text_tokens` tokens, ascending and deduplicated.
pub fn window_widths(synonym_tokens: usize, text_tokens: usize) -> Vec<usize> {
    if text_tokens == 0 {
        return Vec::new();
    }

    let k = synonym_tokens.max(1);
    let widths: BTreeSet<usize> = [k - 1, k, k + 1]
        .into_iter()
        .map(|w| w.clamp(1, text_tokens))
        .collect();
    widths.into_iter().collect()
}

/// Every contiguous span of every allowed width
pub fn for_synonym(
    value: usize,
    synonym: usize,
    synonym_tokens: usize,
    text_tokens: usize,
) -> impl Iterator<Item = Candidate> {
    window_widths(synonym_tokens, text_tokens)
        .into_iter()
        .flat_map(move |width| {
            (0..=text_tokens - width).map(move |first_token| Candidate {
                value,
                synonym,
                first_token,
                end_token: first_token + width,
            })
        })
}
