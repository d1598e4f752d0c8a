//! Extractor - runs every definition over one text
//!
//! Pipeline per call: tokenize once, then for each definition generate
//! candidates, score them, resolve overlaps, drop winners below the
//! definition's level, and finally merge all definitions (and pattern
//! entities) sorted by position.
//!
//! Overlaps are resolved over everything the loosest level would admit, so
//! a stricter level only ever removes winners. That keeps
//! `exact ⊆ strict ⊆ medium ⊆ loose` for any text.

use crate::candidates;
use crate::config::ExtractorConfig;
use crate::engine::{self, EngineKind, LazyEngine, SimilarityEngine};
use crate::error::{EngineError, EngineInitError, ExtractError, ValidationError};
use crate::model::{
    DefinitionSet, EntityDefinition, EntityKind, ExtractedEntity, FuzzyLevel, PatternDefinition,
};
use crate::overlap;
use crate::pattern::PatternExtractor;
use crate::scoring::{self, Scorer};
use crate::tokenizer::{Token, Tokenizer, WhitespaceTokenizer};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A synonym prepared once at construction
#[derive(Debug, Clone)]
struct Synonym {
    text: String,
    normalized: String,
    token_count: usize,
    char_len: usize,
}

#[derive(Debug, Clone)]
struct Value {
    canonical_name: String,
    synonyms: Vec<Synonym>,
}

#[derive(Debug, Clone)]
struct Definition {
    name: String,
    level: FuzzyLevel,
    values: Vec<Value>,
}

/// Fuzzy list-entity extractor.
///
/// Immutable after construction and safe to share across threads; every
/// call to [`Extractor::extract`] allocates its own intermediate state.
pub struct Extractor {
    definitions: Vec<Definition>,
    patterns: PatternExtractor,
    tokenizer: Arc<dyn Tokenizer>,
    engine_kind: EngineKind,
    engine: LazyEngine,
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("definitions", &self.definitions)
            .field("patterns", &self.patterns)
            .field("engine_kind", &self.engine_kind)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Extractor {
    /// Validate and compile `definitions`. The engine itself is not touched
    /// until the first extraction (or [`Extractor::warm_up`]).
    pub fn new(
        definitions: &[EntityDefinition],
        config: ExtractorConfig,
    ) -> Result<Self, ValidationError> {
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(WhitespaceTokenizer);
        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(definitions.len());

        for definition in definitions {
            if !seen.insert(definition.name.as_str()) {
                return Err(ValidationError::DuplicateEntity {
                    name: definition.name.clone(),
                });
            }
            compiled.push(compile(definition, tokenizer.as_ref())?);
        }

        debug!(
            definitions = compiled.len(),
            engine = %config.engine,
            "compiled entity definitions"
        );

        Ok(Self {
            definitions: compiled,
            patterns: PatternExtractor::default(),
            tokenizer,
            engine_kind: config.engine,
            engine: engine::build(config.engine, config.portable_module),
        })
    }

    /// List and pattern entities from one document
    pub fn from_definition_set(
        set: &DefinitionSet,
        config: ExtractorConfig,
    ) -> Result<Self, ValidationError> {
        Self::new(&set.entities, config)?.with_patterns(&set.patterns)
    }

    /// Also report regex pattern entities
    pub fn with_patterns(mut self, patterns: &[PatternDefinition]) -> Result<Self, ValidationError> {
        self.patterns = PatternExtractor::new(patterns)?;
        Ok(self)
    }

    /// Split text (and synonyms) with `tokenizer` instead of on whitespace.
    ///
    /// Synonym token counts are recomputed, so candidate windows follow the
    /// new segmentation. Tokens must carry byte offsets into the text they
    /// came from.
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(tokenizer);
        for definition in &mut self.definitions {
            for value in &mut definition.values {
                for synonym in &mut value.synonyms {
                    synonym.token_count = tokenizer.tokenize(&synonym.normalized).len();
                }
            }
        }
        self.tokenizer = tokenizer;
        self
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.engine_kind
    }

    /// Load the engine now instead of on the first extraction
    pub fn warm_up(&self) -> Result<(), EngineInitError> {
        self.engine.get().map(|_| ())
    }

    /// All matches in `text`, sorted by start offset, then entity name.
    ///
    /// Offsets are byte offsets into `text`. No match is an empty vector,
    /// not an error.
    pub fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>, ExtractError> {
        let tokens = self.tokenizer.tokenize(text);

        let mut results = Vec::new();
        if !tokens.is_empty() && !self.definitions.is_empty() {
            let engine = self.engine.get()?;
            let lowered: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
            for definition in &self.definitions {
                results.extend(extract_definition(
                    definition,
                    text,
                    &tokens,
                    &lowered,
                    engine.as_ref(),
                )?);
            }
        }
        results.extend(self.patterns.extract(text));

        results.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.entity_name.cmp(&b.entity_name))
                .then_with(|| a.end.cmp(&b.end))
                .then_with(|| a.value.cmp(&b.value))
        });

        debug!(
            tokens = tokens.len(),
            entities = results.len(),
            "extraction complete"
        );
        Ok(results)
    }
}

fn compile(
    definition: &EntityDefinition,
    tokenizer: &dyn Tokenizer,
) -> Result<Definition, ValidationError> {
    if definition.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if definition.values.is_empty() {
        return Err(ValidationError::EmptyValues {
            entity: definition.name.clone(),
        });
    }

    let mut values = Vec::with_capacity(definition.values.len());
    for value in &definition.values {
        let mut normalized_seen = HashSet::new();
        let synonyms: Vec<Synonym> = value
            .synonyms
            .iter()
            .filter_map(|text| {
                let normalized = scoring::normalize(text);
                if normalized.is_empty() || !normalized_seen.insert(normalized.clone()) {
                    return None;
                }
                Some(Synonym {
                    text: text.clone(),
                    token_count: tokenizer.tokenize(&normalized).len(),
                    char_len: normalized.chars().count(),
                    normalized,
                })
            })
            .collect();

        if synonyms.is_empty() {
            return Err(ValidationError::EmptySynonyms {
                entity: definition.name.clone(),
                value: value.canonical_name.clone(),
            });
        }

        values.push(Value {
            canonical_name: value.canonical_name.clone(),
            synonyms,
        });
    }

    Ok(Definition {
        name: definition.name.clone(),
        level: definition.fuzzy_level,
        values,
    })
}

fn extract_definition(
    definition: &Definition,
    text: &str,
    tokens: &[Token],
    lowered: &[String],
    engine: &dyn SimilarityEngine,
) -> Result<Vec<ExtractedEntity>, EngineError> {
    let scorer = Scorer::new(engine);
    let mut admitted = Vec::new();

    for (value_idx, value) in definition.values.iter().enumerate() {
        for (synonym_idx, synonym) in value.synonyms.iter().enumerate() {
            let spans =
                candidates::for_synonym(value_idx, synonym_idx, synonym.token_count, tokens.len());
            for candidate in spans {
                let span = lowered[candidate.first_token..candidate.end_token].join(" ");
                if let Some(scored) = scorer.admit(
                    definition.level,
                    candidate,
                    &span,
                    &synonym.normalized,
                    synonym.char_len,
                )? {
                    admitted.push(scored);
                }
            }
        }
    }

    let winners = overlap::resolve(admitted, tokens.len());

    Ok(winners
        .into_iter()
        .filter_map(|scored| {
            let candidate = scored.candidate;
            let value = &definition.values[candidate.value];
            let synonym = &value.synonyms[candidate.synonym];
            if !scoring::accepts(definition.level, scored.score, synonym.char_len) {
                return None;
            }

            let start = tokens[candidate.first_token].start;
            let end = tokens[candidate.end_token - 1].end;
            Some(ExtractedEntity {
                kind: EntityKind::List,
                entity_name: definition.name.clone(),
                value: value.canonical_name.clone(),
                synonym: synonym.text.clone(),
                matched_text: text.get(start..end).unwrap_or_default().to_string(),
                start,
                end,
                confidence: scored.score,
            })
        })
        .collect())
}
