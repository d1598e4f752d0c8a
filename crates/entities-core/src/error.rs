//! Error types for definition validation, engine loading and extraction

use std::path::PathBuf;
use thiserror::Error;

/// Definition problems detected while building an extractor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("entity name must not be empty")]
    EmptyName,

    #[error("entity '{entity}' has no values")]
    EmptyValues { entity: String },

    #[error("value '{value}' of entity '{entity}' has no non-empty synonym")]
    EmptySynonyms { entity: String, value: String },

    #[error("entity '{name}' is defined more than once")]
    DuplicateEntity { name: String },

    #[error("invalid pattern for entity '{name}': {message}")]
    InvalidPattern { name: String, message: String },
}

/// The portable module could not be brought up.
///
/// Cloneable because the outcome of the one-time load is memoized and handed
/// to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineInitError {
    #[error("failed to read portable module {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("failed to compile portable module: {0}")]
    Compile(String),

    #[error("failed to instantiate portable module: {0}")]
    Instantiate(String),

    #[error("portable module does not export '{name}'")]
    MissingExport { name: String },

    #[error("portable module ABI version {found} is not supported (expected {expected})")]
    AbiMismatch { expected: u32, found: u32 },

    #[error("portable engine support was not compiled in (enable the 'portable' feature)")]
    Unsupported,
}

/// A call into an initialized engine failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("portable call '{function}' failed: {message}")]
    Call { function: String, message: String },

    #[error("portable memory access failed: {message}")]
    Memory { message: String },
}

/// Errors surfaced by [`crate::Extractor::extract`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    EngineInit(#[from] EngineInitError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
