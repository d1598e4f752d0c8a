//! Extractor configuration
//!
//! Environment variables read by [`ExtractorConfig::from_env`]:
//! - `ENTITIES_ENGINE`: `reference` (default) or `portable`
//! - `ENTITIES_WASM_PATH`: path to the portable module (default: `entities_wasm.wasm`)

use crate::engine::{EngineKind, ModuleSource};
use std::path::PathBuf;
use thiserror::Error;

pub const ENGINE_VAR: &str = "ENTITIES_ENGINE";
pub const WASM_PATH_VAR: &str = "ENTITIES_WASM_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

/// Fixed for the lifetime of an [`crate::Extractor`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub engine: EngineKind,
    /// Only read when `engine` is [`EngineKind::Portable`]
    pub portable_module: ModuleSource,
}

impl ExtractorConfig {
    pub fn reference() -> Self {
        Self::default()
    }

    pub fn portable(module: ModuleSource) -> Self {
        Self {
            engine: EngineKind::Portable,
            portable_module: module,
        }
    }

    /// Defaults overridden by `ENTITIES_ENGINE` / `ENTITIES_WASM_PATH`.
    ///
    /// An unrecognized engine name is an error rather than a fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(ENGINE_VAR).ok(),
            std::env::var(WASM_PATH_VAR).ok(),
        )
    }

    fn from_vars(engine: Option<String>, wasm_path: Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(engine) = engine.filter(|s| !s.trim().is_empty()) {
            config.engine = engine
                .parse()
                .map_err(|message| ConfigError::InvalidVar {
                    var: ENGINE_VAR,
                    message,
                })?;
        }

        if let Some(path) = wasm_path.filter(|s| !s.trim().is_empty()) {
            config.portable_module = ModuleSource::Path(PathBuf::from(path));
        }

        Ok(config)
    }
}
