//! Calculator catalog and dispatch
//!
//! Every calculator is a request record that implements [`Calculator`].
//! [`CalculatorKind`] names them for routing, and [`evaluate`] runs one
//! from untyped JSON form state so the HTTP and WASM shells share a single
//! entry point.

use crate::errors::CalculatorError;
use crate::{
    activity, body_composition, cycle, diabetes, fasting, health_metrics, heart_rate, nutrition,
    sleep,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Inputs that come from the caller's environment rather than the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalContext {
    /// Date the calculation is made on; used by the calendar calculators
    pub today: NaiveDate,
}

impl EvalContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// A single-shot, stateless calculation from form input to a result record
pub trait Calculator {
    type Output: Serialize;

    fn compute(&self, ctx: &EvalContext) -> Result<Self::Output, CalculatorError>;
}

/// Navigation category a calculator is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BodyComposition,
    NutritionMetabolism,
    Fitness,
    Sleep,
    WomensHealth,
    HealthRisk,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::BodyComposition,
        Category::NutritionMetabolism,
        Category::Fitness,
        Category::Sleep,
        Category::WomensHealth,
        Category::HealthRisk,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Category::BodyComposition => "Body Composition",
            Category::NutritionMetabolism => "Nutrition & Metabolism",
            Category::Fitness => "Fitness",
            Category::Sleep => "Sleep",
            Category::WomensHealth => "Women's Health",
            Category::HealthRisk => "Health Risk",
        }
    }
}

/// Every calculator the library provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Bmi,
    BodyFat,
    WaistHipRatio,
    IdealWeight,
    Bmr,
    Calorie,
    Protein,
    WaterIntake,
    FiberIntake,
    IntermittentFasting,
    HeartRate,
    CaloriesBurned,
    SleepCycle,
    SleepDebt,
    SleepLength,
    Pregnancy,
    Ovulation,
    PeriodCycle,
    DiabetesRisk,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 19] = [
        CalculatorKind::Bmi,
        CalculatorKind::BodyFat,
        CalculatorKind::WaistHipRatio,
        CalculatorKind::IdealWeight,
        CalculatorKind::Bmr,
        CalculatorKind::Calorie,
        CalculatorKind::Protein,
        CalculatorKind::WaterIntake,
        CalculatorKind::FiberIntake,
        CalculatorKind::IntermittentFasting,
        CalculatorKind::HeartRate,
        CalculatorKind::CaloriesBurned,
        CalculatorKind::SleepCycle,
        CalculatorKind::SleepDebt,
        CalculatorKind::SleepLength,
        CalculatorKind::Pregnancy,
        CalculatorKind::Ovulation,
        CalculatorKind::PeriodCycle,
        CalculatorKind::DiabetesRisk,
    ];

    /// URL segment, e.g. `/calculators/bmi`
    pub fn slug(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "bmi",
            CalculatorKind::BodyFat => "body-fat",
            CalculatorKind::WaistHipRatio => "waist-hip-ratio",
            CalculatorKind::IdealWeight => "ideal-weight",
            CalculatorKind::Bmr => "bmr",
            CalculatorKind::Calorie => "calorie",
            CalculatorKind::Protein => "protein",
            CalculatorKind::WaterIntake => "water-intake",
            CalculatorKind::FiberIntake => "fiber-intake",
            CalculatorKind::IntermittentFasting => "intermittent-fasting",
            CalculatorKind::HeartRate => "heart-rate",
            CalculatorKind::CaloriesBurned => "calories-burned",
            CalculatorKind::SleepCycle => "sleep-cycle",
            CalculatorKind::SleepDebt => "sleep-debt",
            CalculatorKind::SleepLength => "sleep-length",
            CalculatorKind::Pregnancy => "pregnancy",
            CalculatorKind::Ovulation => "ovulation",
            CalculatorKind::PeriodCycle => "period-cycle",
            CalculatorKind::DiabetesRisk => "diabetes-risk",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "BMI Calculator",
            CalculatorKind::BodyFat => "Body Fat Calculator",
            CalculatorKind::WaistHipRatio => "Waist-to-Hip Ratio Calculator",
            CalculatorKind::IdealWeight => "Ideal Weight Calculator",
            CalculatorKind::Bmr => "BMR Calculator",
            CalculatorKind::Calorie => "Calorie Calculator",
            CalculatorKind::Protein => "Protein Intake Calculator",
            CalculatorKind::WaterIntake => "Water Intake Calculator",
            CalculatorKind::FiberIntake => "Fiber Intake Calculator",
            CalculatorKind::IntermittentFasting => "Intermittent Fasting Calculator",
            CalculatorKind::HeartRate => "Heart Rate Zone Calculator",
            CalculatorKind::CaloriesBurned => "Calories Burned Calculator",
            CalculatorKind::SleepCycle => "Sleep Cycle Calculator",
            CalculatorKind::SleepDebt => "Sleep Debt Calculator",
            CalculatorKind::SleepLength => "Sleep Length Calculator",
            CalculatorKind::Pregnancy => "Pregnancy Due Date Calculator",
            CalculatorKind::Ovulation => "Ovulation Calculator",
            CalculatorKind::PeriodCycle => "Period Cycle Calculator",
            CalculatorKind::DiabetesRisk => "Diabetes Risk Calculator",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CalculatorKind::Bmi => "Body Mass Index with category and healthy weight range",
            CalculatorKind::BodyFat => "Body fat percentage using the US Navy method",
            CalculatorKind::WaistHipRatio => "Waist-to-hip ratio and associated health risk",
            CalculatorKind::IdealWeight => "Ideal body weight from four published formulas",
            CalculatorKind::Bmr => "Basal metabolic rate and daily energy expenditure",
            CalculatorKind::Calorie => "Daily calories and macronutrients for your goal",
            CalculatorKind::Protein => "Daily protein needs based on activity and goal",
            CalculatorKind::WaterIntake => "Recommended daily water intake",
            CalculatorKind::FiberIntake => "Recommended daily dietary fiber",
            CalculatorKind::IntermittentFasting => "Eating and fasting windows for popular protocols",
            CalculatorKind::HeartRate => "Training zones using the Karvonen method",
            CalculatorKind::CaloriesBurned => "Energy burned during an activity using MET values",
            CalculatorKind::SleepCycle => "Bedtimes and wake times aligned to 90-minute cycles",
            CalculatorKind::SleepDebt => "Accumulated sleep debt and recovery plan",
            CalculatorKind::SleepLength => "Recommended sleep duration for your age",
            CalculatorKind::Pregnancy => "Due date, gestational age and milestones",
            CalculatorKind::Ovulation => "Ovulation date and fertile window",
            CalculatorKind::PeriodCycle => "Upcoming periods and current cycle phase",
            CalculatorKind::DiabetesRisk => "Type 2 diabetes risk score",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            CalculatorKind::Bmi
            | CalculatorKind::BodyFat
            | CalculatorKind::WaistHipRatio
            | CalculatorKind::IdealWeight => Category::BodyComposition,
            CalculatorKind::Bmr
            | CalculatorKind::Calorie
            | CalculatorKind::Protein
            | CalculatorKind::WaterIntake
            | CalculatorKind::FiberIntake
            | CalculatorKind::IntermittentFasting => Category::NutritionMetabolism,
            CalculatorKind::HeartRate | CalculatorKind::CaloriesBurned => Category::Fitness,
            CalculatorKind::SleepCycle | CalculatorKind::SleepDebt | CalculatorKind::SleepLength => {
                Category::Sleep
            }
            CalculatorKind::Pregnancy | CalculatorKind::Ovulation | CalculatorKind::PeriodCycle => {
                Category::WomensHealth
            }
            CalculatorKind::DiabetesRisk => Category::HealthRisk,
        }
    }

    pub fn info(&self) -> CalculatorInfo {
        CalculatorInfo {
            slug: self.slug(),
            title: self.title(),
            description: self.description(),
            category: self.category(),
        }
    }
}

impl std::str::FromStr for CalculatorKind {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| CalculatorError::UnknownCalculator(s.to_string()))
    }
}

/// Listing metadata for one calculator
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorInfo {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
}

/// Calculators grouped under one category heading
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub category: Category,
    pub title: &'static str,
    pub calculators: Vec<CalculatorInfo>,
}

/// The full catalog grouped by category, in navigation order
pub fn catalog() -> Vec<CategoryListing> {
    Category::ALL
        .iter()
        .map(|category| CategoryListing {
            category: *category,
            title: category.title(),
            calculators: CalculatorKind::ALL
                .iter()
                .filter(|kind| kind.category() == *category)
                .map(|kind| kind.info())
                .collect(),
        })
        .collect()
}

fn run<C>(input: serde_json::Value, ctx: &EvalContext) -> Result<serde_json::Value, CalculatorError>
where
    C: Calculator + DeserializeOwned + Validate,
{
    let request: C = serde_json::from_value(input)?;
    request.validate()?;
    let output = request.compute(ctx)?;
    Ok(serde_json::to_value(output)?)
}

/// Deserialize, validate and compute one calculator from JSON form state
pub fn evaluate(
    kind: CalculatorKind,
    input: serde_json::Value,
    ctx: &EvalContext,
) -> Result<serde_json::Value, CalculatorError> {
    match kind {
        CalculatorKind::Bmi => run::<health_metrics::BmiRequest>(input, ctx),
        CalculatorKind::Bmr => run::<health_metrics::BmrRequest>(input, ctx),
        CalculatorKind::Calorie => run::<health_metrics::CalorieRequest>(input, ctx),
        CalculatorKind::BodyFat => run::<body_composition::BodyFatRequest>(input, ctx),
        CalculatorKind::WaistHipRatio => run::<body_composition::WaistHipRequest>(input, ctx),
        CalculatorKind::IdealWeight => run::<body_composition::IdealWeightRequest>(input, ctx),
        CalculatorKind::Protein => run::<nutrition::ProteinRequest>(input, ctx),
        CalculatorKind::WaterIntake => run::<nutrition::WaterRequest>(input, ctx),
        CalculatorKind::FiberIntake => run::<nutrition::FiberRequest>(input, ctx),
        CalculatorKind::IntermittentFasting => run::<fasting::FastingRequest>(input, ctx),
        CalculatorKind::HeartRate => run::<heart_rate::HeartRateRequest>(input, ctx),
        CalculatorKind::CaloriesBurned => run::<activity::CaloriesBurnedRequest>(input, ctx),
        CalculatorKind::SleepCycle => run::<sleep::SleepCycleRequest>(input, ctx),
        CalculatorKind::SleepDebt => run::<sleep::SleepDebtRequest>(input, ctx),
        CalculatorKind::SleepLength => run::<sleep::SleepLengthRequest>(input, ctx),
        CalculatorKind::Pregnancy => run::<cycle::PregnancyRequest>(input, ctx),
        CalculatorKind::Ovulation => run::<cycle::OvulationRequest>(input, ctx),
        CalculatorKind::PeriodCycle => run::<cycle::PeriodRequest>(input, ctx),
        CalculatorKind::DiabetesRisk => run::<diabetes::DiabetesRiskRequest>(input, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn ctx() -> EvalContext {
        EvalContext::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_slugs_are_unique_and_round_trip() {
        let slugs: HashSet<_> = CalculatorKind::ALL.iter().map(|k| k.slug()).collect();
        assert_eq!(slugs.len(), CalculatorKind::ALL.len());

        for kind in CalculatorKind::ALL {
            assert_eq!(CalculatorKind::from_slug(kind.slug()), Some(kind));
        }
        assert!("horoscope".parse::<CalculatorKind>().is_err());
    }

    #[test]
    fn test_catalog_lists_every_calculator_once() {
        let listing = catalog();
        assert_eq!(listing.len(), Category::ALL.len());
        let total: usize = listing.iter().map(|c| c.calculators.len()).sum();
        assert_eq!(total, CalculatorKind::ALL.len());
        assert!(listing.iter().all(|c| !c.calculators.is_empty()));
    }

    #[test]
    fn test_evaluate_bmi() {
        let result = evaluate(
            CalculatorKind::Bmi,
            json!({ "weight": 70.0, "height": 175.0 }),
            &ctx(),
        )
        .unwrap();
        assert_eq!(result["bmi"], 22.9);
        assert_eq!(result["category_label"], "Normal weight");
    }

    #[test]
    fn test_evaluate_missing_input_returns_no_result() {
        let err = evaluate(CalculatorKind::Bmi, json!({ "weight": 70.0 }), &ctx()).unwrap_err();
        assert_eq!(err, CalculatorError::MissingInput("height".to_string()));
    }

    #[test]
    fn test_evaluate_out_of_range_input() {
        let err = evaluate(
            CalculatorKind::HeartRate,
            json!({ "age": 40, "resting_heart_rate": 5 }),
            &ctx(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("resting_heart_rate"));
    }

    #[test]
    fn test_evaluate_malformed_input() {
        let err = evaluate(CalculatorKind::Bmi, json!({ "weight": "heavy" }), &ctx()).unwrap_err();
        assert!(matches!(err, CalculatorError::MalformedInput(_)));
    }

    #[test]
    fn test_every_calculator_rejects_empty_form() {
        // An empty form never produces a result
        for kind in CalculatorKind::ALL {
            let result = evaluate(kind, json!({}), &ctx());
            assert!(result.is_err(), "{} accepted an empty form", kind.slug());
        }
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let input = json!({
            "last_period": "2024-01-01",
            "cycle_length": 28
        });
        let first = evaluate(CalculatorKind::Ovulation, input.clone(), &ctx()).unwrap();
        let second = evaluate(CalculatorKind::Ovulation, input, &ctx()).unwrap();
        assert_eq!(first, second);
    }
}
