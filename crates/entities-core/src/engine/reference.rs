//! In-process reference engine

use super::SimilarityEngine;
use crate::error::EngineError;
use crate::similarity;

/// Direct calls into [`crate::similarity`]. Infallible; the `Result` only
/// exists to share the engine contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEngine;

impl SimilarityEngine for ReferenceEngine {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn edit_distance(&self, a: &str, b: &str) -> Result<usize, EngineError> {
        Ok(similarity::edit_distance(a, b))
    }

    fn edit_similarity(&self, a: &str, b: &str) -> Result<f64, EngineError> {
        Ok(similarity::edit_similarity(a, b))
    }

    fn jaro_winkler_similarity(&self, a: &str, b: &str) -> Result<f64, EngineError> {
        Ok(similarity::jaro_winkler_similarity(a, b))
    }
}
