//! Regex pattern entities
//!
//! Each match of a pattern is reported with confidence 1 and the matched
//! text as its value.
//!
//! # Example
//!
//! ```rust
//! use entities_core::{PatternDefinition, PatternExtractor};
//!
//! let extractor = PatternExtractor::new(&[PatternDefinition::new(
//!     "sets_and_reps",
//!     "[1-9][0-9]? ?x ?[1-9][0-9]?",
//! )])
//! .unwrap();
//!
//! let found = extractor.extract("I did squats with 405 for 3x5");
//! assert_eq!(found[0].value, "3x5");
//! assert_eq!((found[0].start, found[0].end), (26, 29));
//! ```

use crate::error::ValidationError;
use crate::model::{EntityKind, ExtractedEntity, PatternDefinition};
use regex::{Regex, RegexBuilder};

#[derive(Debug)]
struct CompiledPattern {
    name: String,
    regex: Regex,
}

/// Compiled set of pattern entities
#[derive(Debug, Default)]
pub struct PatternExtractor {
    patterns: Vec<CompiledPattern>,
}

impl PatternExtractor {
    /// Compile every pattern; case-insensitive unless `match_case` is set
    pub fn new(definitions: &[PatternDefinition]) -> Result<Self, ValidationError> {
        let patterns = definitions
            .iter()
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Every non-overlapping, non-empty match of every pattern, in pattern
    /// order then position
    pub fn extract(&self, text: &str) -> Vec<ExtractedEntity> {
        self.patterns
            .iter()
            .flat_map(|pattern| {
                pattern
                    .regex
                    .find_iter(text)
                    .filter(|m| !m.is_empty())
                    .map(move |m| ExtractedEntity {
                        kind: EntityKind::Pattern,
                        entity_name: pattern.name.clone(),
                        value: m.as_str().to_string(),
                        synonym: m.as_str().to_string(),
                        matched_text: m.as_str().to_string(),
                        start: m.start(),
                        end: m.end(),
                        confidence: 1.0,
                    })
            })
            .collect()
    }
}

fn compile(definition: &PatternDefinition) -> Result<CompiledPattern, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidPattern {
        name: definition.name.clone(),
        message,
    };

    if definition.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if definition.pattern.is_empty() {
        return Err(invalid("pattern is empty".to_string()));
    }

    let regex = RegexBuilder::new(&definition.pattern)
        .case_insensitive(!definition.match_case)
        .build()
        .map_err(|e| invalid(e.to_string()))?;

    Ok(CompiledPattern {
        name: definition.name.clone(),
        regex,
    })
}
