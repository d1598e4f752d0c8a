//! Entities Core
//!
//! Fuzzy list-entity extraction: given named lists of canonical values and
//! their synonyms, find every occurrence in free text, tolerating typos and
//! small variations, and report non-overlapping matches with confidences.
//!
//! The same similarity primitives run in-process ([`engine::ReferenceEngine`])
//! or from the precompiled `entities-wasm` module (`PortableEngine`), and
//! both produce identical extraction results.
//!
//! # Features
//!
//! - `portable` (default) - host-side loader for the `entities-wasm` module
//!
//! # Example
//!
//! ```rust
//! use entities_core::{EntityDefinition, Extractor, ExtractorConfig, FuzzyLevel};
//!
//! let fruit = EntityDefinition::new("fruit", FuzzyLevel::Medium)
//!     .value("apple", ["apple"])
//!     .value("orange", ["orange", "oranges"]);
//!
//! let extractor = Extractor::new(&[fruit], ExtractorConfig::reference()).unwrap();
//! let found = extractor.extract("I like appels and oranges").unwrap();
//!
//! assert_eq!(found.len(), 2);
//! assert_eq!(found[0].value, "apple");
//! assert_eq!(found[0].matched_text, "appels");
//! assert_eq!(found[1].confidence, 1.0);
//! ```

pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod model;
pub mod overlap;
pub mod pattern;
pub mod scoring;
pub mod similarity;
pub mod tokenizer;

// Re-export main types at crate root
pub use config::{ConfigError, ExtractorConfig};
pub use engine::{EngineKind, ModuleSource, SimilarityEngine};
pub use error::{EngineError, EngineInitError, ExtractError, ValidationError};
pub use extractor::Extractor;
pub use model::{
    DefinitionSet, EntityDefinition, EntityKind, EntityValue, ExtractedEntity, FuzzyLevel,
    PatternDefinition,
};
pub use pattern::PatternExtractor;
pub use similarity::{edit_distance, edit_similarity, jaro_winkler_similarity};
pub use tokenizer::{tokenize, Token, Tokenizer, WhitespaceTokenizer};
