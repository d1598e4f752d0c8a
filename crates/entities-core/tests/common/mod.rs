//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::path::PathBuf;

/// Text with its expected entity spans marked in brackets.
///
/// `"I like [appels] and oranges"` becomes the clean text
/// `"I like appels and oranges"` with one expected span `(7, 13)`.
#[derive(Debug)]
pub struct Annotated {
    pub text: String,
    pub spans: Vec<(usize, usize)>,
}

pub fn annotated(template: &str) -> Annotated {
    let mut text = String::with_capacity(template.len());
    let mut spans = Vec::new();
    let mut open = None;

    for c in template.chars() {
        match c {
            '[' => {
                assert!(open.is_none(), "nested '[' in {:?}", template);
                open = Some(text.len());
            }
            ']' => {
                let start = open.take().unwrap_or_else(|| panic!("unbalanced ']' in {:?}", template));
                spans.push((start, text.len()));
            }
            _ => text.push(c),
        }
    }
    assert!(open.is_none(), "unclosed '[' in {:?}", template);

    Annotated { text, spans }
}

/// Location of a built `entities-wasm` module, if there is one.
///
/// `ENTITIES_WASM_PATH` wins; otherwise the workspace release artifact.
pub fn portable_module() -> Option<PathBuf> {
    let path = match std::env::var("ENTITIES_WASM_PATH") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/wasm32-unknown-unknown/release/entities_wasm.wasm"),
    };
    path.is_file().then_some(path)
}

/// Like [`portable_module`], but panics with build instructions when the
/// module is missing. Used by the `#[ignore]`d portable tests, which only
/// run on request:
///
/// ```text
/// cargo build -p entities-wasm --target wasm32-unknown-unknown --release
/// cargo test -p entities-core -- --ignored
/// ```
pub fn require_portable_module() -> PathBuf {
    portable_module().unwrap_or_else(|| {
        panic!(
            "entities_wasm.wasm not found; build it with \
             `cargo build -p entities-wasm --target wasm32-unknown-unknown --release` \
             or point ENTITIES_WASM_PATH at it"
        )
    })
}
