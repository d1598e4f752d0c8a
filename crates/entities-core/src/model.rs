//! Entity definitions and extraction results

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much a span may deviate from a synonym and still match
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FuzzyLevel {
    /// Identical after normalization
    Exact,
    Strict,
    #[default]
    Medium,
    Loose,
}

impl FuzzyLevel {
    pub const ALL: [FuzzyLevel; 4] = [
        FuzzyLevel::Exact,
        FuzzyLevel::Strict,
        FuzzyLevel::Medium,
        FuzzyLevel::Loose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuzzyLevel::Exact => "exact",
            FuzzyLevel::Strict => "strict",
            FuzzyLevel::Medium => "medium",
            FuzzyLevel::Loose => "loose",
        }
    }
}

impl fmt::Display for FuzzyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical value and the surface strings that refer to it.
///
/// Include the canonical name in `synonyms` if it should match too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValue {
    pub canonical_name: String,
    pub synonyms: Vec<String>,
}

impl EntityValue {
    pub fn new(
        canonical_name: impl Into<String>,
        synonyms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            synonyms: synonyms.into_iter().map(|s| s.into()).collect(),
        }
    }
}

/// A named list entity (e.g. "fruit") with its values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    #[serde(default, alias = "fuzzy")]
    pub fuzzy_level: FuzzyLevel,
    pub values: Vec<EntityValue>,
}

impl EntityDefinition {
    pub fn new(name: impl Into<String>, fuzzy_level: FuzzyLevel) -> Self {
        Self {
            name: name.into(),
            fuzzy_level,
            values: Vec::new(),
        }
    }

    /// Append a value, builder style
    pub fn value(
        mut self,
        canonical_name: impl Into<String>,
        synonyms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.values.push(EntityValue::new(canonical_name, synonyms));
        self
    }
}

/// A regex-backed entity (e.g. "sets_and_reps" = `[1-9][0-9]? ?x ?[1-9][0-9]?`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub match_case: bool,
}

impl PatternDefinition {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            match_case: false,
        }
    }

    pub fn match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }
}

/// Everything a host hands over in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSet {
    #[serde(default)]
    pub entities: Vec<EntityDefinition>,
    #[serde(default)]
    pub patterns: Vec<PatternDefinition>,
}

impl DefinitionSet {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Which extractor produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    List,
    Pattern,
}

/// One extracted span. `start..end` are byte offsets into the input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub kind: EntityKind,
    pub entity_name: String,
    /// Canonical value (pattern entities: the matched text)
    pub value: String,
    /// Synonym that scored best against the span
    pub synonym: String,
    pub matched_text: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder() {
        let def = EntityDefinition::new("fruit", FuzzyLevel::Medium)
            .value("Apple", ["apple", "apples"])
            .value("Blueberry", ["blueberry"]);

        assert_eq!(def.values.len(), 2);
        assert_eq!(def.values[0].synonyms, vec!["apple", "apples"]);
    }

    #[test]
    fn test_definition_set_from_json() {
        let json = r#"{
            "entities": [
                {
                    "name": "airport",
                    "fuzzy": "strict",
                    "values": [{ "canonical_name": "JFK", "synonyms": ["JFK", "New-York"] }]
                },
                {
                    "name": "fruit",
                    "values": [{ "canonical_name": "Apple", "synonyms": ["apple"] }]
                }
            ],
            "patterns": [{ "name": "sets_and_reps", "pattern": "[1-9]x[1-9]" }]
        }"#;

        let set = DefinitionSet::from_json(json).unwrap();
        assert_eq!(set.entities[0].fuzzy_level, FuzzyLevel::Strict);
        assert_eq!(set.entities[1].fuzzy_level, FuzzyLevel::Medium);
        assert!(!set.patterns[0].match_case);
    }

    #[test]
    fn test_fuzzy_level_serde() {
        let level: FuzzyLevel = serde_json::from_str("\"loose\"").unwrap();
        assert_eq!(level, FuzzyLevel::Loose);
        assert_eq!(serde_json::to_string(&FuzzyLevel::Exact).unwrap(), "\"exact\"");
        assert_eq!(FuzzyLevel::Strict.to_string(), "strict");
    }
}
