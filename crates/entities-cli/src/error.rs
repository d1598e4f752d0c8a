//! Error type for the entities command-line tool.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Definition file or output serialization
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Environment configuration
    #[error("configuration error: {0}")]
    Config(#[from] entities_core::ConfigError),

    /// Definitions rejected while building the extractor
    #[error("invalid definitions: {0}")]
    Validation(#[from] entities_core::ValidationError),

    #[error("extraction failed: {0}")]
    Extract(#[from] entities_core::ExtractError),

    #[error("engine failed to load: {0}")]
    EngineInit(#[from] entities_core::EngineInitError),

    #[error("engine call failed: {0}")]
    Engine(#[from] entities_core::EngineError),
}

/// Result type alias using the CLI Error.
pub type Result<T> = std::result::Result<T, Error>;
