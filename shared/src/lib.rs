//! Health Calculators Shared Library
//!
//! Pure formula library behind every calculator. The backend and WASM
//! crates wrap it; neither adds formulas of its own.

pub mod activity;
pub mod body_composition;
pub mod calculator;
pub mod cycle;
pub mod diabetes;
pub mod errors;
pub mod fasting;
pub mod health_metrics;
pub mod heart_rate;
pub mod nutrition;
pub mod sleep;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use calculator::{catalog, evaluate, Calculator, CalculatorInfo, CalculatorKind, Category, CategoryListing, EvalContext};
pub use errors::*;
pub use health_metrics::{calculate_bmi, calculate_tdee, ActivityLevel, BiologicalSex, HealthProfile};

// Export units module items (canonical source for unit types)
pub use units::*;
