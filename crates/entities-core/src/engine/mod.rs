//! Similarity engines
//!
//! Every engine exposes the same three primitives and must agree with the
//! reference implementation within 1e-9:
//!
//! - **Reference**: in-process calls into [`crate::similarity`], always available
//! - **Portable**: the precompiled `entities-wasm` module, run through the
//!   `wasmi` interpreter for sandboxed hosts where only that format loads
//!
//! The portable engine is loaded lazily, once per [`crate::Extractor`], by
//! [`LazyEngine`].
//!
//! # Example
//!
//! ```rust
//! use entities_core::engine::{ReferenceEngine, SimilarityEngine};
//!
//! let engine = ReferenceEngine;
//! assert_eq!(engine.edit_distance("kitten", "sitting").unwrap(), 3);
//! ```

pub mod abi;
mod lazy;
#[cfg(feature = "portable")]
mod portable;
mod reference;

pub use lazy::LazyEngine;
#[cfg(feature = "portable")]
pub use portable::PortableEngine;
pub use reference::ReferenceEngine;

use crate::error::{EngineError, EngineInitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// File name of the portable module when no path is configured
pub const DEFAULT_MODULE_FILE: &str = "entities_wasm.wasm";

/// Uniform capability over the computation backends
pub trait SimilarityEngine: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    fn edit_distance(&self, a: &str, b: &str) -> Result<usize, EngineError>;

    fn edit_similarity(&self, a: &str, b: &str) -> Result<f64, EngineError>;

    fn jaro_winkler_similarity(&self, a: &str, b: &str) -> Result<f64, EngineError>;
}

/// Backend selection, fixed for an extractor's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Reference,
    Portable,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Reference => "reference",
            EngineKind::Portable => "portable",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "native" => Ok(EngineKind::Reference),
            "portable" | "wasm" => Ok(EngineKind::Portable),
            other => Err(format!(
                "unknown engine '{}' (expected 'reference' or 'portable')",
                other
            )),
        }
    }
}

/// Where the portable module bytes come from
#[derive(Clone, PartialEq, Eq)]
pub enum ModuleSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl ModuleSource {
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        ModuleSource::Bytes(bytes.into())
    }
}

impl Default for ModuleSource {
    fn default() -> Self {
        ModuleSource::Path(PathBuf::from(DEFAULT_MODULE_FILE))
    }
}

impl fmt::Debug for ModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ModuleSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// Build the engine for `kind`. Reference engines are ready immediately;
/// portable engines load on first use.
pub(crate) fn build(kind: EngineKind, source: ModuleSource) -> LazyEngine {
    match kind {
        EngineKind::Reference => LazyEngine::ready(Arc::new(ReferenceEngine)),
        EngineKind::Portable => LazyEngine::new(move || load_portable(&source)),
    }
}

#[cfg(feature = "portable")]
fn load_portable(source: &ModuleSource) -> Result<Arc<dyn SimilarityEngine>, EngineInitError> {
    let engine = PortableEngine::load(source)?;
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "portable"))]
fn load_portable(_source: &ModuleSource) -> Result<Arc<dyn SimilarityEngine>, EngineInitError> {
    Err(EngineInitError::Unsupported)
}
