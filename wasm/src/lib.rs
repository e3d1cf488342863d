//! Health Calculators WASM Module
//!
//! WebAssembly bindings so the browser can run every calculator locally
//! with the same formulas the backend uses.

use chrono::NaiveDate;
use health_calculators_shared::{
    calculator::{self, CalculatorKind, EvalContext},
    health_metrics::{self, BiologicalSex},
    units::{HeightUnit, WeightUnit},
    validation::user_message,
    CalculatorError,
};
use wasm_bindgen::prelude::*;

/// Run a calculator by slug
///
/// `input_json` is the form state as a JSON object and `today` an ISO date
/// (`YYYY-MM-DD`) supplied by the page. Returns the result as JSON, or a
/// user-facing error message.
#[wasm_bindgen]
pub fn compute(slug: &str, input_json: &str, today: &str) -> Result<String, JsValue> {
    compute_json(slug, input_json, today).map_err(|e| JsValue::from_str(&user_message(&e)))
}

/// Calculator catalog grouped by category, as JSON
#[wasm_bindgen]
pub fn list_calculators() -> String {
    catalog_json()
}

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    health_metrics::calculate_bmi(weight_kg, height_cm)
}

/// Calculate TDEE (Total Daily Energy Expenditure)
/// Uses Mifflin-St Jeor equation
#[wasm_bindgen]
pub fn calculate_tdee(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    is_male: bool,
    activity_multiplier: f64,
) -> f64 {
    let sex = if is_male { BiologicalSex::Male } else { BiologicalSex::Female };
    health_metrics::calculate_bmr_mifflin(weight_kg, height_cm, age_years as i32, sex) * activity_multiplier
}

/// Convert a weight between unit names such as `kg`, `lbs` or `stone`
#[wasm_bindgen]
pub fn convert_weight(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    weight_between(value, from, to).map_err(|e| JsValue::from_str(&user_message(&e)))
}

/// Convert a height between unit names such as `cm`, `m`, `in` or `ft/in`
#[wasm_bindgen]
pub fn convert_height(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    height_between(value, from, to).map_err(|e| JsValue::from_str(&user_message(&e)))
}

/// Height formatted in the given unit, e.g. `5'9"` for `ft/in`
#[wasm_bindgen]
pub fn format_height(cm: f64, unit: &str) -> Result<String, JsValue> {
    let unit: HeightUnit = unit.parse().map_err(|e| JsValue::from_str(&user_message(&e)))?;
    Ok(unit.format(cm))
}

fn weight_between(value: f64, from: &str, to: &str) -> Result<f64, CalculatorError> {
    let from: WeightUnit = from.parse()?;
    let to: WeightUnit = to.parse()?;
    Ok(to.from_kg(from.to_kg(value)))
}

fn height_between(value: f64, from: &str, to: &str) -> Result<f64, CalculatorError> {
    let from: HeightUnit = from.parse()?;
    let to: HeightUnit = to.parse()?;
    Ok(to.from_cm(from.to_cm(value)))
}

fn compute_json(slug: &str, input_json: &str, today: &str) -> Result<String, CalculatorError> {
    let kind: CalculatorKind = slug.parse()?;
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d")
        .map_err(|_| CalculatorError::invalid("today", "Invalid date format. Use YYYY-MM-DD"))?;
    let input: serde_json::Value = serde_json::from_str(input_json)?;

    let result = calculator::evaluate(kind, input, &EvalContext::new(today))?;
    Ok(result.to_string())
}

fn catalog_json() -> String {
    // The catalog holds only strings and enums, so serialization cannot fail
    serde_json::to_string(&calculator::catalog()).unwrap_or_else(|_| "[]".to_string())
}
