//! Candidate scoring and the length-adjusted threshold policy
//!
//! A span `T` scores `max(edit_similarity, jaro_winkler)` against a synonym
//! `S`, both normalized. It enters overlap resolution when the score
//! reaches the loose threshold, and is reported when it also reaches
//! `threshold(level, |S|)`.
//!
//! Thresholds are expressed as a number of tolerated edits for a synonym of
//! a given length, `1 - allowed / len`, bounded below by a per-level floor:
//!
//! | level  | allowed edits    | floor |
//! |--------|------------------|-------|
//! | exact  | 0                | 1.0   |
//! | strict | `len / 6`        | 0.8   |
//! | medium | `(len + 1) / 5`  | 0.7   |
//! | loose  | `(len + 1) / 3`  | 0.5   |
//!
//! Both columns are monotone across levels, so for every length
//! `exact >= strict >= medium >= loose`.

use crate::candidates::Candidate;
use crate::engine::SimilarityEngine;
use crate::error::EngineError;
use crate::model::FuzzyLevel;

/// Slack for comparing a score against a threshold computed the same way
const SCORE_EPSILON: f64 = 1e-9;

/// Lowercase, trim and collapse whitespace runs to one space
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Minimum score for a synonym of `synonym_len` characters
pub fn threshold(level: FuzzyLevel, synonym_len: usize) -> f64 {
    let len = synonym_len.max(1);
    let (allowed, floor) = match level {
        FuzzyLevel::Exact => return 1.0,
        FuzzyLevel::Strict => (len / 6, 0.8),
        FuzzyLevel::Medium => ((len + 1) / 5, 0.7),
        FuzzyLevel::Loose => ((len + 1) / 3, 0.5),
    };
    (1.0 - allowed as f64 / len as f64).max(floor)
}

pub fn accepts(level: FuzzyLevel, score: f64, synonym_len: usize) -> bool {
    score + SCORE_EPSILON >= threshold(level, synonym_len)
}

/// A candidate admitted to overlap resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

/// Scores normalized span/synonym pairs through an engine
pub struct Scorer<'e> {
    engine: &'e dyn SimilarityEngine,
}

impl<'e> Scorer<'e> {
    pub fn new(engine: &'e dyn SimilarityEngine) -> Self {
        Self { engine }
    }

    /// Score of `span` against `synonym`, both already normalized.
    ///
    /// `exact` never needs the engine: only identical strings can pass.
    pub fn score(&self, level: FuzzyLevel, span: &str, synonym: &str) -> Result<f64, EngineError> {
        if span == synonym {
            return Ok(1.0);
        }
        if level == FuzzyLevel::Exact {
            return Ok(0.0);
        }

        let edit = self.engine.edit_similarity(span, synonym)?;
        let jaro_winkler = self.engine.jaro_winkler_similarity(span, synonym)?;
        Ok(edit.max(jaro_winkler))
    }

    /// Score `span` under `level` and keep it if it clears the loosest
    /// threshold. The definition's own threshold is applied after overlap
    /// resolution, so every level resolves the same pool.
    pub fn admit(
        &self,
        level: FuzzyLevel,
        candidate: Candidate,
        span: &str,
        synonym: &str,
        synonym_len: usize,
    ) -> Result<Option<ScoredCandidate>, EngineError> {
        let score = self.score(level, span, synonym)?;
        Ok(accepts(FuzzyLevel::Loose, score, synonym_len)
            .then_some(ScoredCandidate { candidate, score }))
    }
}
