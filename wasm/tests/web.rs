//! Browser tests for the exported bindings
//!
//! Run with `wasm-pack test --headless --firefox wasm`.

#![cfg(target_arch = "wasm32")]

use health_calculators_wasm::{compute, convert_height, format_height, list_calculators};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn compute_returns_result_json() {
    let output = compute("bmi", r#"{"weight": 70, "height": 175}"#, "2024-03-01").unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["bmi"], 22.9);
}

#[wasm_bindgen_test]
fn compute_rejects_missing_field_with_message() {
    let err = compute("bmi", r#"{"weight": 70}"#, "2024-03-01").unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("Height is required"));
}

#[wasm_bindgen_test]
fn catalog_lists_every_category() {
    let json: serde_json::Value = serde_json::from_str(&list_calculators()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 6);
}

#[wasm_bindgen_test]
fn height_helpers_parse_unit_names() {
    assert_eq!(format_height(175.26, "ft/in").unwrap(), "5'9\"");
    assert!(convert_height(170.0, "cm", "cubits").is_err());
}
