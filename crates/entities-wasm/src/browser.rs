//! Browser bindings using wasm-bindgen
//!
//! Same computations as the raw ABI exports, but with wasm-bindgen handling
//! strings so JavaScript can call them directly. Extraction results come
//! back as a JSON string.

use entities_core::similarity;
use wasm_bindgen::prelude::*;

/// Route Rust panics to console.error instead of "RuntimeError: unreachable"
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen(js_name = editDistance)]
pub fn edit_distance_js(a: &str, b: &str) -> u32 {
    similarity::edit_distance(a, b) as u32
}

#[wasm_bindgen(js_name = editSimilarity)]
pub fn edit_similarity_js(a: &str, b: &str) -> f64 {
    similarity::edit_similarity(a, b)
}

#[wasm_bindgen(js_name = jaroWinklerSimilarity)]
pub fn jaro_winkler_similarity_js(a: &str, b: &str) -> f64 {
    similarity::jaro_winkler_similarity(a, b)
}

/// Extract entities from `text` using a `DefinitionSet` JSON document.
/// Returns the extracted entities as a JSON array.
#[wasm_bindgen(js_name = extractEntities)]
pub fn extract_entities(definitions_json: &str, text: &str) -> Result<String, JsValue> {
    crate::extract_json(definitions_json, text).map_err(|e| JsValue::from_str(&e))
}
