//! Greedy overlap resolution within one entity definition

use crate::scoring::ScoredCandidate;
use std::cmp::Ordering;

/// Keep a non-overlapping subset of `scored`, best first.
///
/// Candidates are ranked by score (descending), token width (descending),
/// start (ascending), then value and synonym index so ties are stable. Each
/// is kept unless one of its tokens is already claimed. The result is in
/// acceptance order.
pub fn resolve(mut scored: Vec<ScoredCandidate>, text_tokens: usize) -> Vec<ScoredCandidate> {
    scored.sort_by(rank);

    let mut claimed = vec![false; text_tokens];
    let mut kept = Vec::new();

    for item in scored {
        let span = item.candidate.first_token..item.candidate.end_token;
        if claimed[span.clone()].iter().any(|c| *c) {
            continue;
        }
        claimed[span].iter_mut().for_each(|c| *c = true);
        kept.push(item);
    }

    kept
}

fn rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.candidate.width().cmp(&a.candidate.width()))
        .then_with(|| a.candidate.first_token.cmp(&b.candidate.first_token))
        .then_with(|| a.candidate.value.cmp(&b.candidate.value))
        .then_with(|| a.candidate.synonym.cmp(&b.candidate.synonym))
}
