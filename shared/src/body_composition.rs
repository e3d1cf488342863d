//! Body composition calculators
//!
//! US Navy body fat, waist-to-hip ratio and ideal body weight. All
//! circumference formulas work in centimeters.

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::health_metrics::{calculate_bmi, BiologicalSex};
use crate::units::{round_to, HeightUnit, UnitSystem, WeightUnit};
use crate::validation::{ensure_positive, require};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Body Fat Estimation
// ============================================================================

/// Navy estimates are clamped into this band
pub const BODY_FAT_MIN_PERCENT: f64 = 3.0;
pub const BODY_FAT_MAX_PERCENT: f64 = 50.0;

/// US Navy circumference method
///
/// Men:   495 / (1.0324 - 0.19077·log10(waist - neck) + 0.15456·log10(height)) - 450
/// Women: 495 / (1.29579 - 0.35004·log10(waist + hip - neck) + 0.221·log10(height)) - 450
///
/// `hip_cm` is ignored for men. The result is clamped to 3-50%.
pub fn calculate_navy_body_fat(
    sex: BiologicalSex,
    height_cm: f64,
    waist_cm: f64,
    neck_cm: f64,
    hip_cm: f64,
) -> f64 {
    let density_term = match sex {
        BiologicalSex::Male => {
            1.0324 - 0.19077 * (waist_cm - neck_cm).log10() + 0.15456 * height_cm.log10()
        }
        BiologicalSex::Female => {
            1.29579 - 0.35004 * (waist_cm + hip_cm - neck_cm).log10() + 0.221 * height_cm.log10()
        }
    };
    (495.0 / density_term - 450.0).clamp(BODY_FAT_MIN_PERCENT, BODY_FAT_MAX_PERCENT)
}

/// Estimate body fat percentage from BMI (rough estimate)
///
/// Formula: BF% = 1.20 × BMI + 0.23 × Age - 10.8 × sex - 5.4
/// where sex = 1 for male, 0 for female
pub fn estimate_body_fat_from_bmi(bmi: f64, age_years: i32, sex: BiologicalSex) -> f64 {
    let sex_factor = match sex {
        BiologicalSex::Male => 1.0,
        BiologicalSex::Female => 0.0,
    };
    let bf = 1.20 * bmi + 0.23 * age_years as f64 - 10.8 * sex_factor - 5.4;
    bf.clamp(3.0, 60.0)
}

/// Body fat category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatCategory {
    Essential,
    Athletic,
    Fitness,
    Average,
    Obese,
}

impl BodyFatCategory {
    pub fn description(&self) -> &'static str {
        match self {
            BodyFatCategory::Essential => "Essential Fat",
            BodyFatCategory::Athletic => "Athletes",
            BodyFatCategory::Fitness => "Fitness",
            BodyFatCategory::Average => "Average",
            BodyFatCategory::Obese => "Obese",
        }
    }
}

/// Classify body fat percentage
pub fn classify_body_fat(body_fat_percent: f64, sex: BiologicalSex) -> BodyFatCategory {
    match sex {
        BiologicalSex::Male => {
            if body_fat_percent < 6.0 {
                BodyFatCategory::Essential
            } else if body_fat_percent < 14.0 {
                BodyFatCategory::Athletic
            } else if body_fat_percent < 18.0 {
                BodyFatCategory::Fitness
            } else if body_fat_percent < 25.0 {
                BodyFatCategory::Average
            } else {
                BodyFatCategory::Obese
            }
        }
        BiologicalSex::Female => {
            if body_fat_percent < 14.0 {
                BodyFatCategory::Essential
            } else if body_fat_percent < 21.0 {
                BodyFatCategory::Athletic
            } else if body_fat_percent < 25.0 {
                BodyFatCategory::Fitness
            } else if body_fat_percent < 32.0 {
                BodyFatCategory::Average
            } else {
                BodyFatCategory::Obese
            }
        }
    }
}

/// Body fat form input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BodyFatRequest {
    pub sex: Option<BiologicalSex>,
    #[validate(range(min = 1, max = 120, message = "must be between 1 and 120"))]
    pub age: Option<u32>,
    #[validate(range(min = 1.0, max = 1500.0, message = "must be between 1 and 1500"))]
    pub weight: Option<f64>,
    #[validate(range(min = 20.0, max = 300.0, message = "must be between 20 and 300"))]
    pub height: Option<f64>,
    #[validate(range(min = 10.0, max = 300.0, message = "must be between 10 and 300"))]
    pub waist: Option<f64>,
    #[validate(range(min = 5.0, max = 100.0, message = "must be between 5 and 100"))]
    pub neck: Option<f64>,
    #[validate(range(min = 10.0, max = 300.0, message = "must be between 10 and 300"))]
    pub hip: Option<f64>,
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyFatReport {
    pub body_fat_percent: f64,
    pub category: BodyFatCategory,
    pub category_label: &'static str,
    pub fat_mass: f64,
    pub lean_mass: f64,
    pub weight_unit: WeightUnit,
    /// BMI-based estimate for comparison, when age was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi_estimate_percent: Option<f64>,
}

impl Calculator for BodyFatRequest {
    type Output = BodyFatReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<BodyFatReport, CalculatorError> {
        let units = self.unit_system;
        let sex = require(self.sex, "sex")?;
        let weight = require(self.weight, "weight")?;
        let height_cm = units.length_to_cm(require(self.height, "height")?);
        let waist_cm = units.length_to_cm(require(self.waist, "waist")?);
        let neck_cm = units.length_to_cm(require(self.neck, "neck")?);

        let hip_cm = match sex {
            BiologicalSex::Male => {
                ensure_positive("neck", waist_cm - neck_cm, "must be smaller than waist")?;
                0.0
            }
            BiologicalSex::Female => {
                let hip_cm = units.length_to_cm(require(self.hip, "hip")?);
                ensure_positive(
                    "neck",
                    waist_cm + hip_cm - neck_cm,
                    "must be smaller than waist plus hip",
                )?;
                hip_cm
            }
        };

        let body_fat = calculate_navy_body_fat(sex, height_cm, waist_cm, neck_cm, hip_cm);
        let category = classify_body_fat(body_fat, sex);
        let fat_mass = weight * body_fat / 100.0;

        let weight_kg = units.weight_to_kg(weight);
        let bmi_estimate_percent = self.age.map(|age| {
            round_to(
                estimate_body_fat_from_bmi(calculate_bmi(weight_kg, height_cm), age as i32, sex),
                1,
            )
        });

        Ok(BodyFatReport {
            body_fat_percent: round_to(body_fat, 1),
            category,
            category_label: category.description(),
            fat_mass: round_to(fat_mass, 1),
            lean_mass: round_to(weight - fat_mass, 1),
            weight_unit: units.weight_unit(),
            bmi_estimate_percent,
        })
    }
}

// ============================================================================
// Waist-to-Hip Ratio
// ============================================================================

/// Health risk associated with a waist-to-hip ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaistHipRisk {
    Low,
    Moderate,
    High,
}

impl WaistHipRisk {
    pub fn description(&self) -> &'static str {
        match self {
            WaistHipRisk::Low => "Low Risk",
            WaistHipRisk::Moderate => "Moderate Risk",
            WaistHipRisk::High => "High Risk",
        }
    }
}

/// Fat distribution pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    /// Fat stored around the waist
    Apple,
    /// Fat stored around the hips
    Pear,
}

pub fn calculate_waist_hip_ratio(waist: f64, hip: f64) -> f64 {
    waist / hip
}

/// WHO cut-offs: men 0.95 / 1.0, women 0.80 / 0.85
pub fn classify_waist_hip_ratio(ratio: f64, sex: BiologicalSex) -> WaistHipRisk {
    let (low_max, moderate_max) = match sex {
        BiologicalSex::Male => (0.95, 1.0),
        BiologicalSex::Female => (0.80, 0.85),
    };
    if ratio <= low_max {
        WaistHipRisk::Low
    } else if ratio <= moderate_max {
        WaistHipRisk::Moderate
    } else {
        WaistHipRisk::High
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WaistHipRequest {
    pub sex: Option<BiologicalSex>,
    #[validate(range(min = 10.0, max = 300.0, message = "must be between 10 and 300"))]
    pub waist: Option<f64>,
    #[validate(range(min = 10.0, max = 300.0, message = "must be between 10 and 300"))]
    pub hip: Option<f64>,
    /// Both measurements share a unit, so it only matters for display
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaistHipReport {
    pub ratio: f64,
    pub risk: WaistHipRisk,
    pub risk_label: &'static str,
    pub body_shape: BodyShape,
    /// Highest low-risk ratio for this sex
    pub healthy_max_ratio: f64,
}

impl Calculator for WaistHipRequest {
    type Output = WaistHipReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<WaistHipReport, CalculatorError> {
        let sex = require(self.sex, "sex")?;
        let waist = require(self.waist, "waist")?;
        let hip = require(self.hip, "hip")?;

        let ratio = calculate_waist_hip_ratio(waist, hip);
        let risk = classify_waist_hip_ratio(ratio, sex);
        let body_shape = if risk == WaistHipRisk::Low {
            BodyShape::Pear
        } else {
            BodyShape::Apple
        };

        Ok(WaistHipReport {
            ratio: round_to(ratio, 2),
            risk,
            risk_label: risk.description(),
            body_shape,
            healthy_max_ratio: match sex {
                BiologicalSex::Male => 0.95,
                BiologicalSex::Female => 0.80,
            },
        })
    }
}

// ============================================================================
// Ideal Weight Calculations
// ============================================================================

/// Ideal body weight in kg from several formulas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub devine: f64,
    pub robinson: f64,
    pub miller: f64,
    pub hamwi: f64,
    /// Average of all formulas
    pub average: f64,
}

/// Calculate ideal body weight using multiple formulas
pub fn calculate_ideal_weight(height_cm: f64, sex: BiologicalSex) -> IdealWeightResult {
    let height_inches = HeightUnit::Inches.from_cm(height_cm);
    let inches_over_5ft = (height_inches - 60.0).max(0.0);

    let (devine, robinson, miller, hamwi) = match sex {
        BiologicalSex::Male => (
            50.0 + 2.3 * inches_over_5ft,
            52.0 + 1.9 * inches_over_5ft,
            56.2 + 1.41 * inches_over_5ft,
            48.0 + 2.7 * inches_over_5ft,
        ),
        BiologicalSex::Female => (
            45.5 + 2.3 * inches_over_5ft,
            49.0 + 1.7 * inches_over_5ft,
            53.1 + 1.36 * inches_over_5ft,
            45.5 + 2.2 * inches_over_5ft,
        ),
    };

    IdealWeightResult {
        devine,
        robinson,
        miller,
        hamwi,
        average: (devine + robinson + miller + hamwi) / 4.0,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IdealWeightRequest {
    pub sex: Option<BiologicalSex>,
    #[validate(range(min = 20.0, max = 300.0, message = "must be between 20 and 300"))]
    pub height: Option<f64>,
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdealWeightReport {
    pub devine: f64,
    pub robinson: f64,
    pub miller: f64,
    pub hamwi: f64,
    pub average: f64,
    pub weight_unit: WeightUnit,
    pub height_display: String,
}

impl Calculator for IdealWeightRequest {
    type Output = IdealWeightReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<IdealWeightReport, CalculatorError> {
        let units = self.unit_system;
        let sex = require(self.sex, "sex")?;
        let height_cm = units.length_to_cm(require(self.height, "height")?);

        let result = calculate_ideal_weight(height_cm, sex);
        let present = |kg: f64| round_to(units.weight_from_kg(kg), 1);

        Ok(IdealWeightReport {
            devine: present(result.devine),
            robinson: present(result.robinson),
            miller: present(result.miller),
            hamwi: present(result.hamwi),
            average: present(result.average),
            weight_unit: units.weight_unit(),
            height_display: units.format_height(height_cm),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rstest::rstest;

    fn ctx() -> EvalContext {
        EvalContext::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    // =========================================================================
    // Body Fat Tests
    // =========================================================================

    #[test]
    fn test_navy_body_fat_male() {
        // 180cm, waist 85, neck 38 -> ~16.1%
        let bf = calculate_navy_body_fat(BiologicalSex::Male, 180.0, 85.0, 38.0, 0.0);
        assert!((bf - 16.1).abs() < 0.1, "got {}", bf);
    }

    #[test]
    fn test_navy_body_fat_female() {
        // 165cm, waist 75, hip 100, neck 33 -> ~29.4%
        let bf = calculate_navy_body_fat(BiologicalSex::Female, 165.0, 75.0, 33.0, 100.0);
        assert!((bf - 29.4).abs() < 0.1, "got {}", bf);
    }

    #[test]
    fn test_body_fat_report() {
        let request = BodyFatRequest {
            sex: Some(BiologicalSex::Male),
            age: Some(30),
            weight: Some(80.0),
            height: Some(180.0),
            waist: Some(85.0),
            neck: Some(38.0),
            ..Default::default()
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.category, BodyFatCategory::Fitness);
        assert!((report.fat_mass + report.lean_mass - 80.0).abs() < 0.2);
        assert!(report.bmi_estimate_percent.is_some());
    }

    #[test]
    fn test_body_fat_female_requires_hip() {
        let request = BodyFatRequest {
            sex: Some(BiologicalSex::Female),
            weight: Some(60.0),
            height: Some(165.0),
            waist: Some(75.0),
            neck: Some(33.0),
            ..Default::default()
        };
        assert_eq!(
            request.compute(&ctx()).unwrap_err(),
            CalculatorError::MissingInput("hip".to_string())
        );
    }

    #[test]
    fn test_body_fat_neck_larger_than_waist() {
        let request = BodyFatRequest {
            sex: Some(BiologicalSex::Male),
            weight: Some(80.0),
            height: Some(180.0),
            waist: Some(40.0),
            neck: Some(45.0),
            ..Default::default()
        };
        let err = request.compute(&ctx()).unwrap_err();
        assert_eq!(err.field(), Some("neck"));
    }

    #[rstest]
    #[case(10.0, BiologicalSex::Male, BodyFatCategory::Athletic)]
    #[case(20.0, BiologicalSex::Male, BodyFatCategory::Average)]
    #[case(30.0, BiologicalSex::Male, BodyFatCategory::Obese)]
    #[case(12.0, BiologicalSex::Female, BodyFatCategory::Essential)]
    #[case(20.0, BiologicalSex::Female, BodyFatCategory::Athletic)]
    #[case(28.0, BiologicalSex::Female, BodyFatCategory::Average)]
    fn test_body_fat_classification(
        #[case] percent: f64,
        #[case] sex: BiologicalSex,
        #[case] expected: BodyFatCategory,
    ) {
        assert_eq!(classify_body_fat(percent, sex), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Navy estimate always lands in the clamp band
        #[test]
        fn prop_navy_body_fat_clamped(
            height in 140.0f64..210.0,
            neck in 25.0f64..50.0,
            extra in 1.0f64..120.0,
            hip in 70.0f64..150.0
        ) {
            let waist = neck + extra;
            for sex in [BiologicalSex::Male, BiologicalSex::Female] {
                let bf = calculate_navy_body_fat(sex, height, waist, neck, hip);
                prop_assert!((BODY_FAT_MIN_PERCENT..=BODY_FAT_MAX_PERCENT).contains(&bf));
            }
        }

        /// Property: A bigger waist never lowers the estimate
        #[test]
        fn prop_navy_body_fat_grows_with_waist(
            height in 160.0f64..200.0,
            waist in 70.0f64..100.0,
            extra in 1.0f64..20.0
        ) {
            let smaller = calculate_navy_body_fat(BiologicalSex::Male, height, waist, 38.0, 0.0);
            let larger = calculate_navy_body_fat(BiologicalSex::Male, height, waist + extra, 38.0, 0.0);
            prop_assert!(larger >= smaller);
        }
    }

    // =========================================================================
    // Waist-Hip Tests
    // =========================================================================

    #[rstest]
    #[case(0.90, BiologicalSex::Male, WaistHipRisk::Low)]
    #[case(0.98, BiologicalSex::Male, WaistHipRisk::Moderate)]
    #[case(1.05, BiologicalSex::Male, WaistHipRisk::High)]
    #[case(0.75, BiologicalSex::Female, WaistHipRisk::Low)]
    #[case(0.83, BiologicalSex::Female, WaistHipRisk::Moderate)]
    #[case(0.90, BiologicalSex::Female, WaistHipRisk::High)]
    fn test_waist_hip_classification(
        #[case] ratio: f64,
        #[case] sex: BiologicalSex,
        #[case] expected: WaistHipRisk,
    ) {
        assert_eq!(classify_waist_hip_ratio(ratio, sex), expected);
    }

    #[test]
    fn test_waist_hip_report() {
        let request = WaistHipRequest {
            sex: Some(BiologicalSex::Female),
            waist: Some(88.0),
            hip: Some(100.0),
            unit_system: UnitSystem::Metric,
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.ratio, 0.88);
        assert_eq!(report.risk, WaistHipRisk::High);
        assert_eq!(report.body_shape, BodyShape::Apple);
    }

    // =========================================================================
    // Ideal Weight Tests
    // =========================================================================

    #[test]
    fn test_ideal_weight() {
        let result = calculate_ideal_weight(180.0, BiologicalSex::Male);
        assert!(result.average > 65.0 && result.average < 85.0);

        let result = calculate_ideal_weight(165.0, BiologicalSex::Female);
        assert!(result.average > 50.0 && result.average < 70.0);
    }

    #[test]
    fn test_ideal_weight_report_imperial() {
        // 6ft male -> Devine 50 + 2.3 * 12 = 77.6 kg ~ 171.1 lbs
        let request = IdealWeightRequest {
            sex: Some(BiologicalSex::Male),
            height: Some(72.0),
            unit_system: UnitSystem::Imperial,
        };
        let report = request.compute(&ctx()).unwrap();
        assert!((report.devine - 171.1).abs() < 0.2);
        assert_eq!(report.weight_unit, WeightUnit::Lbs);
        assert_eq!(report.height_display, "6'0\"");
    }
}
