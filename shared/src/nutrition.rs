//! Protein, water and fiber intake targets

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::health_metrics::{ActivityLevel, BiologicalSex};
use crate::units::{round_to, UnitSystem};
use crate::validation::require;
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Protein
// ============================================================================

/// Upper bound for recommended protein, g per kg
pub const MAX_PROTEIN_G_PER_KG: f64 = 2.2;

/// Training goal for protein needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProteinGoal {
    LoseWeight,
    #[default]
    Maintain,
    BuildMuscle,
}

/// Baseline protein per kg of body weight for an activity level
pub fn protein_factor(activity_level: ActivityLevel) -> f64 {
    match activity_level {
        ActivityLevel::Sedentary => 0.8,
        ActivityLevel::LightlyActive => 1.0,
        ActivityLevel::ModeratelyActive => 1.2,
        ActivityLevel::VeryActive => 1.6,
        ActivityLevel::ExtraActive => 1.8,
    }
}

/// Protein per kg after goal and age adjustments
pub fn adjusted_protein_factor(activity_level: ActivityLevel, goal: ProteinGoal, age_years: u32) -> f64 {
    let base = protein_factor(activity_level);
    let factor = match goal {
        ProteinGoal::LoseWeight => base + 0.2,
        ProteinGoal::Maintain => base,
        ProteinGoal::BuildMuscle => base.max(1.6) + 0.4,
    };
    // Older adults need more to offset muscle loss
    let factor = if age_years >= 65 { factor.max(1.0) } else { factor };
    factor.min(MAX_PROTEIN_G_PER_KG)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProteinRequest {
    #[validate(range(min = 1.0, max = 1500.0, message = "must be between 1 and 1500"))]
    pub weight: Option<f64>,
    #[validate(range(min = 1, max = 120, message = "must be between 1 and 120"))]
    pub age: Option<u32>,
    pub activity_level: ActivityLevel,
    pub goal: ProteinGoal,
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProteinReport {
    pub daily_grams: f64,
    pub min_grams: f64,
    pub max_grams: f64,
    pub grams_per_kg: f64,
    pub per_meal_three_meals: f64,
    pub per_meal_four_meals: f64,
    pub calories_from_protein: f64,
    pub tips: Vec<&'static str>,
}

impl Calculator for ProteinRequest {
    type Output = ProteinReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<ProteinReport, CalculatorError> {
        let weight_kg = self.unit_system.weight_to_kg(require(self.weight, "weight")?);
        let age = require(self.age, "age")?;

        let factor = adjusted_protein_factor(self.activity_level, self.goal, age);
        let daily = weight_kg * factor;

        let mut tips = vec![
            "Spread protein evenly across your meals",
            "Include a protein source such as eggs, fish, legumes or dairy with every meal",
        ];
        match self.goal {
            ProteinGoal::BuildMuscle => tips.push("Have 20-40 g of protein within two hours after training"),
            ProteinGoal::LoseWeight => tips.push("Higher protein helps preserve muscle while in a calorie deficit"),
            ProteinGoal::Maintain => {}
        }
        if age >= 65 {
            tips.push("Adults over 65 benefit from at least 1.0 g/kg to limit age-related muscle loss");
        }

        Ok(ProteinReport {
            daily_grams: round_to(daily, 0),
            min_grams: round_to(weight_kg * (factor - 0.2).max(0.8), 0),
            max_grams: round_to(weight_kg * (factor + 0.2).min(MAX_PROTEIN_G_PER_KG), 0),
            grams_per_kg: round_to(factor, 2),
            per_meal_three_meals: round_to(daily / 3.0, 0),
            per_meal_four_meals: round_to(daily / 4.0, 0),
            calories_from_protein: round_to(daily * 4.0, 0),
            tips,
        })
    }
}

// ============================================================================
// Hydration
// ============================================================================

/// Extra water for hot or humid weather, ml
pub const HOT_CLIMATE_EXTRA_ML: f64 = 500.0;
/// Extra water per minute of exercise, ml (~350 ml per 30 min)
pub const EXERCISE_ML_PER_MINUTE: f64 = 12.0;

pub const CUP_ML: f64 = 240.0;
pub const US_FL_OZ_ML: f64 = 29.5735;

/// Calculate recommended daily water intake
///
/// Base formula: 30ml per kg of body weight, adjusted for activity level
pub fn calculate_daily_water_ml(weight_kg: f64, activity_level: ActivityLevel) -> i32 {
    let base_ml = weight_kg * 30.0;
    let adjusted = match activity_level {
        ActivityLevel::Sedentary => base_ml,
        ActivityLevel::LightlyActive => base_ml * 1.1,
        ActivityLevel::ModeratelyActive => base_ml * 1.2,
        ActivityLevel::VeryActive => base_ml * 1.3,
        ActivityLevel::ExtraActive => base_ml * 1.4,
    };
    adjusted.round() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    #[default]
    Temperate,
    Hot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WaterRequest {
    #[validate(range(min = 1.0, max = 1500.0, message = "must be between 1 and 1500"))]
    pub weight: Option<f64>,
    pub activity_level: ActivityLevel,
    #[validate(range(min = 0.0, max = 600.0, message = "must be between 0 and 600 minutes"))]
    pub exercise_minutes: Option<f64>,
    pub climate: Climate,
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterReport {
    pub daily_ml: i32,
    pub liters: f64,
    pub cups: f64,
    pub fl_oz: f64,
    pub base_ml: i32,
    pub exercise_ml: i32,
    pub climate_ml: i32,
    pub tips: Vec<&'static str>,
}

impl Calculator for WaterRequest {
    type Output = WaterReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<WaterReport, CalculatorError> {
        let weight_kg = self.unit_system.weight_to_kg(require(self.weight, "weight")?);

        let base_ml = calculate_daily_water_ml(weight_kg, self.activity_level);
        let exercise_ml = (self.exercise_minutes.unwrap_or(0.0) * EXERCISE_ML_PER_MINUTE).round() as i32;
        let climate_ml = match self.climate {
            Climate::Temperate => 0,
            Climate::Hot => HOT_CLIMATE_EXTRA_ML as i32,
        };
        let daily_ml = base_ml + exercise_ml + climate_ml;
        let daily = daily_ml as f64;

        Ok(WaterReport {
            daily_ml,
            liters: round_to(daily / 1000.0, 1),
            cups: round_to(daily / CUP_ML, 1),
            fl_oz: round_to(daily / US_FL_OZ_ML, 0),
            base_ml,
            exercise_ml,
            climate_ml,
            tips: vec![
                "Keep a reusable bottle with you through the day",
                "Drink a glass of water with every meal",
                "Pale yellow urine is a good sign of adequate hydration",
            ],
        })
    }
}

// ============================================================================
// Fiber
// ============================================================================

/// Fiber per 1000 kcal (Institute of Medicine)
pub const FIBER_G_PER_1000_KCAL: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    #[default]
    None,
    Pregnant,
    Lactating,
}

/// Adequate daily fiber intake by age and sex, grams
pub fn recommended_fiber_g(age_years: u32, sex: BiologicalSex, stage: LifeStage) -> f64 {
    match stage {
        LifeStage::Pregnant if sex == BiologicalSex::Female => return 28.0,
        LifeStage::Lactating if sex == BiologicalSex::Female => return 29.0,
        _ => {}
    }
    match (age_years, sex) {
        (0..=3, _) => 19.0,
        (4..=8, _) => 25.0,
        (9..=13, BiologicalSex::Male) => 31.0,
        (9..=13, BiologicalSex::Female) => 26.0,
        (14..=50, BiologicalSex::Male) => 38.0,
        (14..=18, BiologicalSex::Female) => 26.0,
        (19..=50, BiologicalSex::Female) => 25.0,
        (_, BiologicalSex::Male) => 30.0,
        (_, BiologicalSex::Female) => 21.0,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FiberRequest {
    #[validate(range(min = 1, max = 120, message = "must be between 1 and 120"))]
    pub age: Option<u32>,
    pub sex: Option<BiologicalSex>,
    pub life_stage: LifeStage,
    #[validate(range(min = 500.0, max = 10000.0, message = "must be between 500 and 10000"))]
    pub calorie_intake: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiberReport {
    pub daily_grams: f64,
    /// 14 g per 1000 kcal, when a calorie intake was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_based_grams: Option<f64>,
    pub soluble_grams: f64,
    pub insoluble_grams: f64,
    pub per_meal_grams: f64,
    pub tips: Vec<&'static str>,
}

impl Calculator for FiberRequest {
    type Output = FiberReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<FiberReport, CalculatorError> {
        let age = require(self.age, "age")?;
        let sex = require(self.sex, "sex")?;

        let daily = recommended_fiber_g(age, sex, self.life_stage);
        let calorie_based_grams = self
            .calorie_intake
            .map(|kcal| round_to(kcal / 1000.0 * FIBER_G_PER_1000_KCAL, 0));

        let soluble = round_to(daily * 0.25, 1);

        Ok(FiberReport {
            daily_grams: daily,
            calorie_based_grams,
            soluble_grams: soluble,
            insoluble_grams: round_to(daily - soluble, 1),
            per_meal_grams: round_to(daily / 3.0, 1),
            tips: vec![
                "Increase fiber gradually over a few weeks to avoid bloating",
                "Choose whole grains, legumes, vegetables and fruit with the skin on",
                "Drink more water as you add fiber",
            ],
        })
    }
}
