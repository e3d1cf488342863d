//! Property-based tests for the calculator endpoints' service layer

#[cfg(test)]
mod tests {
    use crate::error::ApiError;
    use crate::services::calculators::CalculatorService;
    use chrono::NaiveDate;
    use health_calculators_shared::calculator::{CalculatorKind, EvalContext};
    use proptest::prelude::*;
    use serde_json::json;

    fn ctx() -> EvalContext {
        EvalContext::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn bmi(weight: f64, height: f64) -> f64 {
        let response =
            CalculatorService::calculate("bmi", json!({ "weight": weight, "height": height }), &ctx())
                .unwrap();
        response.result["bmi"].as_f64().unwrap()
    }

    #[test]
    fn test_every_catalog_slug_resolves() {
        for listing in CalculatorService::catalog() {
            for info in listing.calculators {
                let kind = CalculatorService::resolve(info.slug).unwrap();
                assert_eq!(kind.category(), listing.category);
            }
        }
    }

    #[test]
    fn test_empty_form_never_yields_result() {
        for kind in CalculatorKind::ALL {
            let result = CalculatorService::calculate(kind.slug(), json!({}), &ctx());
            assert!(
                matches!(result, Err(ApiError::MissingInput { .. })),
                "{} did not report a missing input",
                kind.slug()
            );
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Same request, same response
        #[test]
        fn prop_bmi_idempotent(weight in 30.0f64..200.0, height in 120.0f64..220.0) {
            prop_assert_eq!(bmi(weight, height), bmi(weight, height));
        }

        /// Heavier at the same height never lowers BMI
        #[test]
        fn prop_bmi_increasing_in_weight(
            weight in 30.0f64..150.0,
            extra in 1.0f64..50.0,
            height in 120.0f64..220.0
        ) {
            prop_assert!(bmi(weight + extra, height) >= bmi(weight, height));
        }

        /// Taller at the same weight never raises BMI
        #[test]
        fn prop_bmi_decreasing_in_height(
            weight in 30.0f64..200.0,
            height in 120.0f64..200.0,
            extra in 1.0f64..20.0
        ) {
            prop_assert!(bmi(weight, height + extra) <= bmi(weight, height));
        }

        /// Out-of-range resting heart rate is a validation error, never a result
        #[test]
        fn prop_heart_rate_out_of_range_rejected(resting in 121i32..300) {
            let result = CalculatorService::calculate(
                "heart-rate",
                json!({ "age": 30, "resting_heart_rate": resting }),
                &ctx(),
            );
            let is_validation_error = matches!(result, Err(ApiError::Validation { .. }));
            prop_assert!(is_validation_error);
        }
    }
}
