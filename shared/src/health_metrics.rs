//! Health metrics calculations module
//!
//! BMI, BMR, TDEE and goal-based calorie targets.
//!
//! The free functions take metric inputs; the request records convert
//! from the form's unit system before calling them.

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::units::{round_to, UnitSystem, WeightUnit};
use crate::validation::require;
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// User Profile Types
// ============================================================================

/// Biological sex for health calculations
/// Note: This is used for physiological calculations only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
        }
    }
}

/// Body measurements needed for energy calculations, in SI units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: i32,
    pub sex: BiologicalSex,
    pub activity_level: ActivityLevel,
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn recommendations(&self) -> Vec<&'static str> {
        match self {
            BmiCategory::Underweight => vec![
                "Talk with a healthcare provider about healthy ways to gain weight",
                "Add nutrient-dense foods such as nuts, dairy and whole grains",
                "Include strength training to build lean muscle",
            ],
            BmiCategory::Normal => vec![
                "Keep up a balanced diet rich in vegetables, fruit and lean protein",
                "Aim for at least 150 minutes of moderate activity per week",
                "Re-check your BMI periodically to stay on track",
            ],
            BmiCategory::Overweight => vec![
                "Aim for gradual weight loss of 0.5-1 kg per week",
                "Increase daily movement and cut back on sugary drinks",
                "Build meals around vegetables, lean protein and whole grains",
            ],
            BmiCategory::Obese => vec![
                "Consult a healthcare provider for a personalized plan",
                "Losing 5-10% of body weight brings meaningful health benefits",
                "Combine dietary changes with regular physical activity",
            ],
        }
    }
}

/// BMI calculation result in SI units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI value
    pub value: f64,
    /// BMI category
    pub category: BmiCategory,
    /// Healthy weight range in kg for this height
    pub healthy_weight_range_kg: (f64, f64),
    /// Distance from healthy range (negative = under, positive = over, 0 = in range)
    pub distance_from_healthy_kg: f64,
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Calculate healthy weight range for a given height
///
/// Weights giving a BMI of 18.5-24.9
pub fn healthy_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    (18.5 * height_m_sq, 24.9 * height_m_sq)
}

/// Calculate complete BMI result
pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64) -> BmiResult {
    let bmi = calculate_bmi(weight_kg, height_cm);
    let category = classify_bmi(bmi);
    let healthy_range = healthy_weight_range_kg(height_cm);

    let distance = if weight_kg < healthy_range.0 {
        weight_kg - healthy_range.0 // Negative = underweight
    } else if weight_kg > healthy_range.1 {
        weight_kg - healthy_range.1 // Positive = overweight
    } else {
        0.0
    };

    BmiResult {
        value: bmi,
        category,
        healthy_weight_range_kg: healthy_range,
        distance_from_healthy_kg: distance,
    }
}

/// BMI form input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BmiRequest {
    #[validate(range(min = 1.0, max = 1500.0, message = "must be between 1 and 1500"))]
    pub weight: Option<f64>,
    #[validate(range(min = 20.0, max = 300.0, message = "must be between 20 and 300"))]
    pub height: Option<f64>,
    pub unit_system: UnitSystem,
}

/// BMI result as presented on the calculator page
#[derive(Debug, Clone, Serialize)]
pub struct BmiReport {
    pub bmi: f64,
    pub category: BmiCategory,
    pub category_label: &'static str,
    pub healthy_weight_min: f64,
    pub healthy_weight_max: f64,
    /// Signed distance to the healthy range, in `weight_unit`
    pub distance_from_healthy: f64,
    pub weight_unit: WeightUnit,
    pub height_display: String,
    pub recommendations: Vec<&'static str>,
}

impl Calculator for BmiRequest {
    type Output = BmiReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<BmiReport, CalculatorError> {
        let units = self.unit_system;
        let weight_kg = units.weight_to_kg(require(self.weight, "weight")?);
        let height_cm = units.length_to_cm(require(self.height, "height")?);

        let result = calculate_bmi_result(weight_kg, height_cm);
        let (min_kg, max_kg) = result.healthy_weight_range_kg;

        Ok(BmiReport {
            bmi: round_to(result.value, 1),
            category: result.category,
            category_label: result.category.description(),
            healthy_weight_min: round_to(units.weight_from_kg(min_kg), 1),
            healthy_weight_max: round_to(units.weight_from_kg(max_kg), 1),
            distance_from_healthy: round_to(units.weight_from_kg(result.distance_from_healthy_kg), 1),
            weight_unit: units.weight_unit(),
            height_display: units.format_height(height_cm),
            recommendations: result.category.recommendations(),
        })
    }
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// BMR calculation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrMethod {
    /// Mifflin-St Jeor (most accurate for most people)
    #[default]
    MifflinStJeor,
    /// Harris-Benedict (original, less accurate)
    HarrisBenedict,
    /// Katch-McArdle (requires body fat %, most accurate if available)
    KatchMcArdle,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: i32, sex: BiologicalSex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    }
}

/// Calculate BMR using Harris-Benedict equation (revised)
///
/// Men: BMR = 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: BMR = 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn calculate_bmr_harris_benedict(weight_kg: f64, height_cm: f64, age_years: i32, sex: BiologicalSex) -> f64 {
    match sex {
        BiologicalSex::Male => {
            88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years as f64
        }
        BiologicalSex::Female => {
            447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years as f64
        }
    }
}

/// Calculate BMR using Katch-McArdle equation
///
/// BMR = 370 + 21.6 × LBM(kg)
/// LBM = weight × (1 - body_fat_percent/100)
pub fn calculate_bmr_katch_mcardle(weight_kg: f64, body_fat_percent: f64) -> f64 {
    let lean_body_mass = weight_kg * (1.0 - body_fat_percent / 100.0);
    370.0 + 21.6 * lean_body_mass
}

/// Calculate BMR with specified method
///
/// Katch-McArdle needs a body fat percentage and fails without one.
pub fn calculate_bmr(
    profile: &HealthProfile,
    method: BmrMethod,
    body_fat_percent: Option<f64>,
) -> Result<f64, CalculatorError> {
    Ok(match method {
        BmrMethod::MifflinStJeor => {
            calculate_bmr_mifflin(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex)
        }
        BmrMethod::HarrisBenedict => {
            calculate_bmr_harris_benedict(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex)
        }
        BmrMethod::KatchMcArdle => {
            let body_fat = require(body_fat_percent, "body_fat_percent")?;
            calculate_bmr_katch_mcardle(profile.weight_kg, body_fat)
        }
    })
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(profile: &HealthProfile) -> f64 {
    let bmr = calculate_bmr_mifflin(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex);
    bmr * profile.activity_level.multiplier()
}

/// Measurements shared by the BMR and calorie forms
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EnergyInputs {
    #[validate(range(min = 1, max = 120, message = "must be between 1 and 120"))]
    pub age: Option<u32>,
    pub sex: Option<BiologicalSex>,
    #[validate(range(min = 1.0, max = 1500.0, message = "must be between 1 and 1500"))]
    pub weight: Option<f64>,
    #[validate(range(min = 20.0, max = 300.0, message = "must be between 20 and 300"))]
    pub height: Option<f64>,
    pub unit_system: UnitSystem,
    pub activity_level: ActivityLevel,
}

impl EnergyInputs {
    /// Resolve the form into an SI profile, failing on the first missing field
    pub fn profile(&self) -> Result<HealthProfile, CalculatorError> {
        let age = require(self.age, "age")?;
        let sex = require(self.sex, "sex")?;
        let weight = require(self.weight, "weight")?;
        let height = require(self.height, "height")?;

        Ok(HealthProfile {
            height_cm: self.unit_system.length_to_cm(height),
            weight_kg: self.unit_system.weight_to_kg(weight),
            age_years: age as i32,
            sex,
            activity_level: self.activity_level,
        })
    }
}

/// BMR form input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BmrRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub inputs: EnergyInputs,
    pub method: BmrMethod,
    #[validate(range(min = 2.0, max = 70.0, message = "must be between 2 and 70"))]
    pub body_fat_percent: Option<f64>,
}

/// Calories needed at one activity level
#[derive(Debug, Clone, Serialize)]
pub struct ActivityCalories {
    pub activity_level: ActivityLevel,
    pub description: &'static str,
    pub multiplier: f64,
    pub calories: f64,
}

/// BMR result with TDEE for every activity level
#[derive(Debug, Clone, Serialize)]
pub struct BmrReport {
    pub bmr: f64,
    pub method: BmrMethod,
    pub tdee: f64,
    pub activity_multiplier: f64,
    pub tdee_by_activity: Vec<ActivityCalories>,
}

impl Calculator for BmrRequest {
    type Output = BmrReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<BmrReport, CalculatorError> {
        let profile = self.inputs.profile()?;
        let bmr = calculate_bmr(&profile, self.method, self.body_fat_percent)?;

        let tdee_by_activity = ActivityLevel::ALL
            .iter()
            .map(|level| ActivityCalories {
                activity_level: *level,
                description: level.description(),
                multiplier: level.multiplier(),
                calories: round_to(bmr * level.multiplier(), 0),
            })
            .collect();

        Ok(BmrReport {
            bmr: round_to(bmr, 0),
            method: self.method,
            tdee: round_to(bmr * profile.activity_level.multiplier(), 0),
            activity_multiplier: profile.activity_level.multiplier(),
            tdee_by_activity,
        })
    }
}

// ============================================================================
// Goal-Based Calorie Targets
// ============================================================================

/// Lowest daily intake the calculators will recommend
pub const MIN_DAILY_CALORIES: f64 = 1200.0;

/// Weight goal for calorie targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    /// About 0.5 kg per week
    Lose,
    /// About 0.25 kg per week
    MildLose,
    #[default]
    Maintain,
    MildGain,
    Gain,
}

impl WeightGoal {
    pub const ALL: [WeightGoal; 5] = [
        WeightGoal::Lose,
        WeightGoal::MildLose,
        WeightGoal::Maintain,
        WeightGoal::MildGain,
        WeightGoal::Gain,
    ];

    /// Daily calorie adjustment relative to TDEE
    pub fn calorie_delta(&self) -> f64 {
        match self {
            WeightGoal::Lose => -500.0,
            WeightGoal::MildLose => -250.0,
            WeightGoal::Maintain => 0.0,
            WeightGoal::MildGain => 250.0,
            WeightGoal::Gain => 500.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeightGoal::Lose => "Lose 0.5 kg (1 lb) per week",
            WeightGoal::MildLose => "Lose 0.25 kg (0.5 lb) per week",
            WeightGoal::Maintain => "Maintain weight",
            WeightGoal::MildGain => "Gain 0.25 kg (0.5 lb) per week",
            WeightGoal::Gain => "Gain 0.5 kg (1 lb) per week",
        }
    }

    /// Protein / carbohydrate / fat split in percent of calories
    pub fn macro_split(&self) -> (f64, f64, f64) {
        match self {
            WeightGoal::Lose | WeightGoal::MildLose => (35.0, 35.0, 30.0),
            WeightGoal::Maintain => (30.0, 40.0, 30.0),
            WeightGoal::MildGain | WeightGoal::Gain => (25.0, 50.0, 25.0),
        }
    }
}

/// Daily calories for a goal, floored at [`MIN_DAILY_CALORIES`]
pub fn calories_for_goal(tdee: f64, goal: WeightGoal) -> f64 {
    (tdee + goal.calorie_delta()).max(MIN_DAILY_CALORIES)
}

/// Macronutrient targets in grams
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub protein_percent: f64,
    pub carbs_percent: f64,
    pub fat_percent: f64,
}

/// Split calories into macronutrient grams (4 kcal/g protein and carbs, 9 kcal/g fat)
pub fn calculate_macros(calories: f64, goal: WeightGoal) -> Macros {
    let (protein_pct, carbs_pct, fat_pct) = goal.macro_split();
    Macros {
        protein_g: round_to(calories * protein_pct / 100.0 / 4.0, 0),
        carbs_g: round_to(calories * carbs_pct / 100.0 / 4.0, 0),
        fat_g: round_to(calories * fat_pct / 100.0 / 9.0, 0),
        protein_percent: protein_pct,
        carbs_percent: carbs_pct,
        fat_percent: fat_pct,
    }
}

/// Calorie form input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CalorieRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub inputs: EnergyInputs,
    pub goal: WeightGoal,
}

/// Calories needed for one goal
#[derive(Debug, Clone, Serialize)]
pub struct GoalCalories {
    pub goal: WeightGoal,
    pub description: &'static str,
    pub calories: f64,
}

/// Calorie targets for the selected goal
#[derive(Debug, Clone, Serialize)]
pub struct CalorieReport {
    pub bmr: f64,
    pub tdee: f64,
    pub goal: WeightGoal,
    pub goal_calories: f64,
    pub calorie_adjustment: f64,
    /// True when the goal target was raised to the minimum safe intake
    pub at_minimum: bool,
    pub macros: Macros,
    pub goal_options: Vec<GoalCalories>,
}

impl Calculator for CalorieRequest {
    type Output = CalorieReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<CalorieReport, CalculatorError> {
        let profile = self.inputs.profile()?;
        let bmr = calculate_bmr_mifflin(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex);
        let tdee = calculate_tdee(&profile);
        let goal_calories = calories_for_goal(tdee, self.goal);

        let goal_options = WeightGoal::ALL
            .iter()
            .map(|goal| GoalCalories {
                goal: *goal,
                description: goal.description(),
                calories: round_to(calories_for_goal(tdee, *goal), 0),
            })
            .collect();

        Ok(CalorieReport {
            bmr: round_to(bmr, 0),
            tdee: round_to(tdee, 0),
            goal: self.goal,
            goal_calories: round_to(goal_calories, 0),
            calorie_adjustment: self.goal.calorie_delta(),
            at_minimum: tdee + self.goal.calorie_delta() < MIN_DAILY_CALORIES,
            macros: calculate_macros(goal_calories, self.goal),
            goal_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ctx() -> EvalContext {
        EvalContext::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    fn male_profile() -> EnergyInputs {
        EnergyInputs {
            age: Some(30),
            sex: Some(BiologicalSex::Male),
            weight: Some(80.0),
            height: Some(180.0),
            unit_system: UnitSystem::Metric,
            activity_level: ActivityLevel::ModeratelyActive,
        }
    }

    // =========================================================================
    // BMI Tests
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.86).abs() < 0.01);
    }

    #[test]
    fn test_bmi_categories() {
        assert_eq!(classify_bmi(17.0), BmiCategory::Underweight);
        assert_eq!(classify_bmi(18.5), BmiCategory::Normal);
        assert_eq!(classify_bmi(24.99), BmiCategory::Normal);
        assert_eq!(classify_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(classify_bmi(29.9), BmiCategory::Overweight);
        assert_eq!(classify_bmi(30.0), BmiCategory::Obese);
        assert_eq!(classify_bmi(45.0), BmiCategory::Obese);
    }

    #[test]
    fn test_healthy_weight_range() {
        // For 175cm, healthy range should be ~56.7-76.3 kg
        let (min, max) = healthy_weight_range_kg(175.0);
        assert!((min - 56.66).abs() < 0.05);
        assert!((max - 76.26).abs() < 0.05);
    }

    #[test]
    fn test_bmi_report_metric() {
        let request = BmiRequest {
            weight: Some(70.0),
            height: Some(175.0),
            unit_system: UnitSystem::Metric,
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.bmi, 22.9);
        assert_eq!(report.category_label, "Normal weight");
        assert_eq!(report.distance_from_healthy, 0.0);
        assert_eq!(report.weight_unit, WeightUnit::Kg);
        assert_eq!(report.height_display, "175 cm");
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_bmi_report_uk() {
        // 11 st at 5'9"
        let request = BmiRequest {
            weight: Some(11.0),
            height: Some(69.0),
            unit_system: UnitSystem::Uk,
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.bmi, 22.7);
        assert_eq!(report.weight_unit, WeightUnit::Stone);
        assert_eq!(report.height_display, "5'9\"");
        assert!(report.healthy_weight_max < 13.0);
    }

    #[test]
    fn test_bmi_report_imperial() {
        // 200 lbs at 5'9" -> BMI ~29.5
        let request = BmiRequest {
            weight: Some(200.0),
            height: Some(69.0),
            unit_system: UnitSystem::Imperial,
        };
        let report = request.compute(&ctx()).unwrap();
        assert!((report.bmi - 29.5).abs() < 0.1);
        assert_eq!(report.category, BmiCategory::Overweight);
        assert_eq!(report.weight_unit, WeightUnit::Lbs);
        assert_eq!(report.height_display, "5'9\"");
        // Healthy ceiling for 69in is ~168.5 lbs
        assert!((report.healthy_weight_max - 168.5).abs() < 1.0);
        assert!(report.distance_from_healthy > 30.0);
    }

    #[test]
    fn test_bmi_report_missing_height() {
        let request = BmiRequest {
            weight: Some(70.0),
            ..Default::default()
        };
        assert_eq!(
            request.compute(&ctx()).unwrap_err(),
            CalculatorError::MissingInput("height".to_string())
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: BMI is always positive for valid inputs
        #[test]
        fn prop_bmi_positive(weight in 20.0f64..500.0, height in 100.0f64..250.0) {
            let bmi = calculate_bmi(weight, height);
            prop_assert!(bmi > 0.0);
        }

        /// Property: Same inputs always give the same BMI
        #[test]
        fn prop_bmi_idempotent(weight in 20.0f64..500.0, height in 100.0f64..250.0) {
            prop_assert_eq!(calculate_bmi(weight, height), calculate_bmi(weight, height));
        }

        /// Property: Heavier weight = higher BMI (same height)
        #[test]
        fn prop_bmi_increases_with_weight(
            weight1 in 50.0f64..100.0,
            weight2 in 100.0f64..150.0,
            height in 150.0f64..200.0
        ) {
            let bmi1 = calculate_bmi(weight1, height);
            let bmi2 = calculate_bmi(weight2, height);
            prop_assert!(bmi2 > bmi1);
        }

        /// Property: Taller height = lower BMI (same weight)
        #[test]
        fn prop_bmi_decreases_with_height(
            weight in 60.0f64..100.0,
            height1 in 150.0f64..170.0,
            height2 in 180.0f64..200.0
        ) {
            let bmi1 = calculate_bmi(weight, height1);
            let bmi2 = calculate_bmi(weight, height2);
            prop_assert!(bmi1 > bmi2);
        }

        /// Property: Healthy weight range contains weights that produce normal BMI
        #[test]
        fn prop_healthy_range_produces_normal_bmi(height in 150.0f64..200.0) {
            let (min, max) = healthy_weight_range_kg(height);
            let mid_weight = (min + max) / 2.0;
            let bmi = calculate_bmi(mid_weight, height);
            prop_assert_eq!(classify_bmi(bmi), BmiCategory::Normal,
                "Mid-range weight {} at height {} produced BMI {}", mid_weight, height, bmi);
        }
    }

    // =========================================================================
    // BMR/TDEE Tests
    // =========================================================================

    #[test]
    fn test_bmr_mifflin() {
        // 30yo male, 80kg, 180cm -> 800 + 1125 - 150 + 5
        let bmr = calculate_bmr_mifflin(80.0, 180.0, 30, BiologicalSex::Male);
        assert_eq!(bmr, 1780.0);

        // 30yo female, 60kg, 165cm -> 600 + 1031.25 - 150 - 161
        let bmr = calculate_bmr_mifflin(60.0, 165.0, 30, BiologicalSex::Female);
        assert_eq!(bmr, 1320.25);
    }

    #[test]
    fn test_bmr_alternate_methods() {
        let bmr = calculate_bmr_harris_benedict(80.0, 180.0, 30, BiologicalSex::Male);
        assert!((bmr - 1853.6).abs() < 0.5);

        // 80kg at 20% fat -> LBM 64kg -> 370 + 1382.4
        let bmr = calculate_bmr_katch_mcardle(80.0, 20.0);
        assert!((bmr - 1752.4).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_report() {
        let request = BmrRequest {
            inputs: male_profile(),
            ..Default::default()
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.bmr, 1780.0);
        assert_eq!(report.tdee, 2759.0);
        assert_eq!(report.tdee_by_activity.len(), 5);
        assert_eq!(report.tdee_by_activity[0].calories, 2136.0);
    }

    #[test]
    fn test_katch_mcardle_requires_body_fat() {
        let request = BmrRequest {
            inputs: male_profile(),
            method: BmrMethod::KatchMcArdle,
            body_fat_percent: None,
        };
        assert_eq!(
            request.compute(&ctx()).unwrap_err(),
            CalculatorError::MissingInput("body_fat_percent".to_string())
        );
    }

    #[test]
    fn test_calorie_report_for_goal() {
        let request = CalorieRequest {
            inputs: male_profile(),
            goal: WeightGoal::Lose,
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.tdee, 2759.0);
        assert_eq!(report.goal_calories, 2259.0);
        assert!(!report.at_minimum);
        assert_eq!(report.macros.protein_percent, 35.0);
        assert_eq!(report.goal_options.len(), 5);
    }

    #[test]
    fn test_calories_never_below_minimum() {
        assert_eq!(calories_for_goal(1400.0, WeightGoal::Lose), MIN_DAILY_CALORIES);
        assert_eq!(calories_for_goal(1400.0, WeightGoal::Gain), 1900.0);
    }

    #[test]
    fn test_macros_add_back_up() {
        let macros = calculate_macros(2000.0, WeightGoal::Maintain);
        assert_eq!(macros.protein_g, 150.0);
        assert_eq!(macros.carbs_g, 200.0);
        assert_eq!(macros.fat_g, 67.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Male BMR > Female BMR (same stats)
        #[test]
        fn prop_male_bmr_higher(
            weight in 50.0f64..100.0,
            height in 160.0f64..190.0,
            age in 20i32..60
        ) {
            let bmr_male = calculate_bmr_mifflin(weight, height, age, BiologicalSex::Male);
            let bmr_female = calculate_bmr_mifflin(weight, height, age, BiologicalSex::Female);
            prop_assert!(bmr_male > bmr_female);
        }

        /// Property: TDEE > BMR (activity multiplier > 1)
        #[test]
        fn prop_tdee_greater_than_bmr(
            weight in 50.0f64..100.0,
            height in 160.0f64..190.0,
            age in 20i32..60
        ) {
            let profile = HealthProfile {
                height_cm: height,
                weight_kg: weight,
                age_years: age,
                sex: BiologicalSex::Male,
                activity_level: ActivityLevel::Sedentary,
            };
            let bmr = calculate_bmr(&profile, BmrMethod::MifflinStJeor, None).unwrap();
            prop_assert!(calculate_tdee(&profile) > bmr);
        }

        /// Property: Goal calories are ordered from lose to gain
        #[test]
        fn prop_goal_calories_ordered(tdee in 1200.0f64..4000.0) {
            let targets: Vec<f64> = WeightGoal::ALL.iter().map(|g| calories_for_goal(tdee, *g)).collect();
            prop_assert!(targets.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
