//! Entities WASM module
//!
//! Exposes the entities-core similarity primitives and extraction through a
//! plain WASM ABI, loaded by the `portable` engine (wasmi) or any other
//! runtime. No WASI imports needed: every export is pure computation over
//! shared-memory strings.
//!
//! # Memory Protocol
//!
//! Strings cross the WASM boundary as (ptr, len) pairs in linear memory.
//! The host allocates via [`wasm_alloc`], writes bytes, calls the function,
//! reads the result, then frees via [`wasm_free`].
//!
//! Return values pack pointer and length into a single u64:
//! `(ptr << 32) | len`
//!
//! Build with `cargo build -p entities-wasm --target wasm32-unknown-unknown --release`.

#[cfg(feature = "browser")]
mod browser;

use entities_core::engine::abi;
use entities_core::{similarity, DefinitionSet, Extractor, ExtractorConfig};
use std::alloc::{self, Layout};
use std::borrow::Cow;

// ============================================================================
// Memory management
// ============================================================================

/// Byte-aligned layout for a guest buffer; `None` for empty buffers
fn byte_layout(size: u32) -> Option<Layout> {
    match Layout::array::<u8>(size as usize) {
        Ok(layout) if layout.size() > 0 => Some(layout),
        _ => None,
    }
}

/// Reserve `size` bytes for the host to write operands into.
///
/// 0 means nothing was reserved (empty request or out of memory). Every
/// non-zero pointer goes back through [`wasm_free`] with the same size.
#[no_mangle]
pub extern "C" fn wasm_alloc(size: u32) -> u32 {
    let Some(layout) = byte_layout(size) else {
        return 0;
    };
    let ptr = unsafe { alloc::alloc(layout) };
    ptr as u32
}

/// Release operands or a packed result. Null or empty buffers are ignored.
#[no_mangle]
pub extern "C" fn wasm_free(ptr: u32, size: u32) {
    if ptr == 0 {
        return;
    }
    if let Some(layout) = byte_layout(size) {
        unsafe { alloc::dealloc(ptr as *mut u8, layout) }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Borrow the host-written bytes at (ptr, len) as text.
///
/// Invalid UTF-8 is replaced rather than trusted, so a misbehaving host gets
/// a wrong answer instead of undefined behavior.
unsafe fn read_str<'a>(ptr: u32, len: u32) -> Cow<'a, str> {
    if ptr == 0 || len == 0 {
        return Cow::Borrowed("");
    }
    String::from_utf8_lossy(std::slice::from_raw_parts(ptr as *const u8, len as usize))
}

/// Copy `s` into a fresh guest buffer the host owns from now on.
///
/// Returns `abi::pack(ptr, len)`, or 0 when nothing could be allocated.
fn write_result(s: &str) -> u64 {
    let len = match u32::try_from(s.len()) {
        Ok(len) => len,
        Err(_) => return 0,
    };
    let ptr = wasm_alloc(len);
    if ptr == 0 {
        return 0;
    }
    let buffer = unsafe { std::slice::from_raw_parts_mut(ptr as *mut u8, s.len()) };
    buffer.copy_from_slice(s.as_bytes());
    abi::pack(ptr, len)
}

fn error_json(msg: &str) -> String {
    serde_json::json!({ "error": msg }).to_string()
}

/// Run one extraction with the in-module reference engine.
///
/// `definitions` is a `DefinitionSet` document; the result is the JSON
/// array of extracted entities.
pub fn extract_json(definitions: &str, text: &str) -> Result<String, String> {
    let set = DefinitionSet::from_json(definitions)
        .map_err(|e| format!("invalid definitions: {}", e))?;
    let extractor = Extractor::from_definition_set(&set, ExtractorConfig::reference())
        .map_err(|e| e.to_string())?;
    let entities = extractor.extract(text).map_err(|e| e.to_string())?;
    serde_json::to_string(&entities).map_err(|e| format!("serialization failed: {}", e))
}

// ============================================================================
// Version info
// ============================================================================

/// ABI revision the host checks before calling anything else
#[no_mangle]
pub extern "C" fn entities_abi_version() -> u32 {
    abi::ABI_VERSION
}

/// Get the module version. Returns a packed u64 (ptr << 32 | len) pointing
/// to a string containing the version (e.g., "0.1.0").
#[no_mangle]
pub extern "C" fn entities_version() -> u64 {
    write_result(env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// Similarity primitives
// ============================================================================

#[no_mangle]
pub extern "C" fn edit_distance(a_ptr: u32, a_len: u32, b_ptr: u32, b_len: u32) -> u32 {
    let (a, b) = unsafe { (read_str(a_ptr, a_len), read_str(b_ptr, b_len)) };
    similarity::edit_distance(&a, &b) as u32
}

#[no_mangle]
pub extern "C" fn edit_similarity(a_ptr: u32, a_len: u32, b_ptr: u32, b_len: u32) -> f64 {
    let (a, b) = unsafe { (read_str(a_ptr, a_len), read_str(b_ptr, b_len)) };
    similarity::edit_similarity(&a, &b)
}

#[no_mangle]
pub extern "C" fn jaro_winkler_similarity(
    a_ptr: u32,
    a_len: u32,
    b_ptr: u32,
    b_len: u32,
) -> f64 {
    let (a, b) = unsafe { (read_str(a_ptr, a_len), read_str(b_ptr, b_len)) };
    similarity::jaro_winkler_similarity(&a, &b)
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract entities from text. Takes a `DefinitionSet` JSON document and the
/// text, each as (ptr, len). Returns a packed u64 pointing to JSON.
///
/// On success: `[{"kind":"list","entity_name":"fruit","value":"apple",...}]`
/// On error: `{"error":"description"}`
#[no_mangle]
pub extern "C" fn extract(defs_ptr: u32, defs_len: u32, text_ptr: u32, text_len: u32) -> u64 {
    let (definitions, text) =
        unsafe { (read_str(defs_ptr, defs_len), read_str(text_ptr, text_len)) };

    match extract_json(&definitions, &text) {
        Ok(json) => write_result(&json),
        Err(e) => write_result(&error_json(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRUIT: &str = r#"{
        "entities": [
            { "name": "fruit", "fuzzy": "medium",
              "values": [{ "canonical_name": "apple", "synonyms": ["apple"] }] }
        ]
    }"#;

    #[test]
    fn test_extract_json() {
        let json = extract_json(FRUIT, "I like appels and oranges").unwrap();
        let entities: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(entities.as_array().map(Vec::len), Some(1));
        assert_eq!(entities[0]["kind"], "list");
        assert_eq!(entities[0]["value"], "apple");
        assert_eq!(entities[0]["matched_text"], "appels");
        assert_eq!(entities[0]["start"], 7);
    }

    #[test]
    fn test_extract_json_rejects_bad_definitions() {
        let err = extract_json("{not json", "text").unwrap_err();
        assert!(err.starts_with("invalid definitions"));

        let err = extract_json(r#"{"entities":[{"name":"fruit","values":[]}]}"#, "x").unwrap_err();
        assert!(err.contains("no values"));
    }

    #[test]
    fn test_error_json_escapes() {
        let json = error_json(r#"bad "quote""#);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["error"], r#"bad "quote""#);
    }

    #[test]
    fn test_empty_buffers_have_no_layout() {
        assert!(byte_layout(0).is_none());
        assert_eq!(byte_layout(12).map(|l| l.size()), Some(12));
        assert_eq!(wasm_alloc(0), 0);
        wasm_free(0, 16);
        assert_eq!(unsafe { read_str(0, 5) }, "");
    }

    #[test]
    fn test_abi_version() {
        assert_eq!(entities_abi_version(), abi::ABI_VERSION);
    }
}
