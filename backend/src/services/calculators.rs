//! Calculator service
//!
//! Resolves a calculator by slug, runs it through the shared library and
//! records per-calculator outcome metrics.

use crate::error::ApiError;
use health_calculators_shared::{
    calculator::{self, CalculatorInfo, CalculatorKind, CategoryListing, EvalContext},
    CalculatorError,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Counter of calculations, labelled by calculator and outcome
pub const CALCULATIONS_TOTAL: &str = "calculations_total";
/// Histogram of calculation latency in seconds
pub const CALCULATION_DURATION_SECONDS: &str = "calculation_duration_seconds";

/// A computed result with its calculator and evaluation date
#[derive(Debug, Clone, Serialize)]
pub struct CalculationResponse {
    pub calculator: CalculatorInfo,
    pub as_of: chrono::NaiveDate,
    pub result: serde_json::Value,
}

/// Calculator service for business logic
pub struct CalculatorService;

impl CalculatorService {
    /// Look up a calculator by its URL slug
    pub fn resolve(slug: &str) -> Result<CalculatorKind, ApiError> {
        slug.parse::<CalculatorKind>().map_err(ApiError::from)
    }

    /// Catalog grouped by category
    pub fn catalog() -> Vec<CategoryListing> {
        calculator::catalog()
    }

    /// Metadata for one calculator
    pub fn describe(slug: &str) -> Result<CalculatorInfo, ApiError> {
        Ok(Self::resolve(slug)?.info())
    }

    /// Run a calculator against form input
    pub fn calculate(
        slug: &str,
        input: serde_json::Value,
        ctx: &EvalContext,
    ) -> Result<CalculationResponse, ApiError> {
        let kind = Self::resolve(slug)?;
        let started = Instant::now();

        let outcome = calculator::evaluate(kind, input, ctx);

        metrics::histogram!(CALCULATION_DURATION_SECONDS, "calculator" => kind.slug())
            .record(started.elapsed().as_secs_f64());
        metrics::counter!(
            CALCULATIONS_TOTAL,
            "calculator" => kind.slug(),
            "outcome" => outcome_label(&outcome)
        )
        .increment(1);

        match outcome {
            Ok(result) => {
                info!(calculator = kind.slug(), as_of = %ctx.today, "Calculation completed");
                Ok(CalculationResponse {
                    calculator: kind.info(),
                    as_of: ctx.today,
                    result,
                })
            }
            Err(err) => {
                debug!(calculator = kind.slug(), error = %err, "Calculation rejected");
                Err(err.into())
            }
        }
    }
}

fn outcome_label(outcome: &Result<serde_json::Value, CalculatorError>) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(CalculatorError::MissingInput(_)) => "missing_input",
        Err(CalculatorError::Invalid { .. }) => "invalid",
        Err(CalculatorError::MalformedInput(_)) => "malformed",
        Err(CalculatorError::UnknownCalculator(_)) => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn ctx() -> EvalContext {
        EvalContext::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(CalculatorService::resolve("bmi").unwrap(), CalculatorKind::Bmi);
        assert!(matches!(
            CalculatorService::resolve("tarot"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_calculate_wraps_result() {
        let response = CalculatorService::calculate(
            "heart-rate",
            json!({ "age": 40, "resting_heart_rate": 60 }),
            &ctx(),
        )
        .unwrap();
        assert_eq!(response.calculator.slug, "heart-rate");
        assert_eq!(response.as_of, ctx().today);
        assert_eq!(response.result["max_heart_rate"], 180);
    }

    #[test]
    fn test_calculate_missing_input() {
        let err = CalculatorService::calculate("bmr", json!({ "age": 30 }), &ctx()).unwrap_err();
        assert!(matches!(err, ApiError::MissingInput { ref field, .. } if field == "sex"));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(&Ok(json!({}))), "ok");
        assert_eq!(
            outcome_label(&Err(CalculatorError::invalid("age", "out of range"))),
            "invalid"
        );
    }
}
