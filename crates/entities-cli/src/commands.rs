//! Subcommand implementations, kept free of argument parsing and I/O setup

use crate::error::Result;
use entities_core::engine::{PortableEngine, ReferenceEngine, SimilarityEngine};
use entities_core::{
    DefinitionSet, EngineKind, ExtractedEntity, Extractor, ExtractorConfig, ModuleSource,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment config with command-line overrides applied on top
pub fn resolve_config(
    base: ExtractorConfig,
    engine: Option<EngineKind>,
    wasm: Option<PathBuf>,
) -> ExtractorConfig {
    let mut config = base;
    if let Some(engine) = engine {
        config.engine = engine;
    }
    if let Some(path) = wasm {
        config.portable_module = ModuleSource::Path(path);
    }
    config
}

pub fn load_definitions(path: &Path) -> Result<DefinitionSet> {
    let json = std::fs::read_to_string(path)?;
    let set = DefinitionSet::from_json(&json)?;
    debug!(
        path = %path.display(),
        entities = set.entities.len(),
        patterns = set.patterns.len(),
        "loaded definitions"
    );
    Ok(set)
}

pub fn extract(
    definitions: &DefinitionSet,
    config: ExtractorConfig,
    text: &str,
) -> Result<Vec<ExtractedEntity>> {
    let extractor = Extractor::from_definition_set(definitions, config)?;
    let entities = extractor.extract(text)?;
    info!(
        engine = %extractor.engine_kind(),
        entities = entities.len(),
        "extracted entities"
    );
    Ok(entities)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub engine: EngineKind,
    pub edit_distance: usize,
    pub edit_similarity: f64,
    pub jaro_winkler_similarity: f64,
}

pub fn similarity(config: &ExtractorConfig, a: &str, b: &str) -> Result<SimilarityReport> {
    let engine: Box<dyn SimilarityEngine> = match config.engine {
        EngineKind::Reference => Box::new(ReferenceEngine),
        EngineKind::Portable => Box::new(PortableEngine::load(&config.portable_module)?),
    };

    Ok(SimilarityReport {
        engine: config.engine,
        edit_distance: engine.edit_distance(a, b)?,
        edit_similarity: engine.edit_similarity(a, b)?,
        jaro_winkler_similarity: engine.jaro_winkler_similarity(a, b)?,
    })
}
