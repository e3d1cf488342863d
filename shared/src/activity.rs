//! Calories burned during exercise
//!
//! kcal = MET × weight(kg) × hours, with MET values from the Compendium of
//! Physical Activities.

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::units::{round_to, UnitSystem};
use crate::validation::require;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Activities offered on the calories-burned form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseActivity {
    Walking,
    BriskWalking,
    Hiking,
    Running,
    Cycling,
    Swimming,
    Yoga,
    WeightLifting,
    Hiit,
    Dancing,
    JumpRope,
    Elliptical,
    Rowing,
    Basketball,
    Soccer,
    Tennis,
}

impl ExerciseActivity {
    pub const ALL: [ExerciseActivity; 16] = [
        ExerciseActivity::Walking,
        ExerciseActivity::BriskWalking,
        ExerciseActivity::Hiking,
        ExerciseActivity::Running,
        ExerciseActivity::Cycling,
        ExerciseActivity::Swimming,
        ExerciseActivity::Yoga,
        ExerciseActivity::WeightLifting,
        ExerciseActivity::Hiit,
        ExerciseActivity::Dancing,
        ExerciseActivity::JumpRope,
        ExerciseActivity::Elliptical,
        ExerciseActivity::Rowing,
        ExerciseActivity::Basketball,
        ExerciseActivity::Soccer,
        ExerciseActivity::Tennis,
    ];

    /// Metabolic equivalent for the activity
    pub fn met(&self) -> f64 {
        match self {
            ExerciseActivity::Walking => 3.5,
            ExerciseActivity::BriskWalking => 4.3,
            ExerciseActivity::Hiking => 6.0,
            ExerciseActivity::Running => 9.8,
            ExerciseActivity::Cycling => 7.5,
            ExerciseActivity::Swimming => 8.0,
            ExerciseActivity::Yoga => 2.5,
            ExerciseActivity::WeightLifting => 6.0,
            ExerciseActivity::Hiit => 8.0,
            ExerciseActivity::Dancing => 5.0,
            ExerciseActivity::JumpRope => 12.3,
            ExerciseActivity::Elliptical => 5.0,
            ExerciseActivity::Rowing => 7.0,
            ExerciseActivity::Basketball => 6.5,
            ExerciseActivity::Soccer => 7.0,
            ExerciseActivity::Tennis => 7.3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExerciseActivity::Walking => "Walking (3 mph)",
            ExerciseActivity::BriskWalking => "Brisk walking (3.5 mph)",
            ExerciseActivity::Hiking => "Hiking",
            ExerciseActivity::Running => "Running (6 mph)",
            ExerciseActivity::Cycling => "Cycling (12-14 mph)",
            ExerciseActivity::Swimming => "Swimming laps",
            ExerciseActivity::Yoga => "Yoga",
            ExerciseActivity::WeightLifting => "Weight lifting (vigorous)",
            ExerciseActivity::Hiit => "HIIT / circuit training",
            ExerciseActivity::Dancing => "Dancing",
            ExerciseActivity::JumpRope => "Jumping rope",
            ExerciseActivity::Elliptical => "Elliptical trainer",
            ExerciseActivity::Rowing => "Rowing machine",
            ExerciseActivity::Basketball => "Basketball",
            ExerciseActivity::Soccer => "Soccer",
            ExerciseActivity::Tennis => "Tennis",
        }
    }
}

/// Energy burned for an activity
pub fn calculate_calories_burned(met: f64, weight_kg: f64, duration_minutes: f64) -> f64 {
    met * weight_kg * (duration_minutes / 60.0)
}

/// Minutes of an activity needed to burn a calorie amount
pub fn minutes_to_burn(calories: f64, met: f64, weight_kg: f64) -> f64 {
    calories / (met * weight_kg) * 60.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CaloriesBurnedRequest {
    pub activity: Option<ExerciseActivity>,
    #[validate(range(min = 1.0, max = 1500.0, message = "must be between 1 and 1500"))]
    pub weight: Option<f64>,
    #[validate(range(min = 1.0, max = 1440.0, message = "must be between 1 and 1440 minutes"))]
    pub duration_minutes: Option<f64>,
    pub unit_system: UnitSystem,
}

/// Time another activity would take to burn the same energy
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEquivalent {
    pub activity: ExerciseActivity,
    pub label: &'static str,
    pub minutes: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaloriesBurnedReport {
    pub activity: ExerciseActivity,
    pub label: &'static str,
    pub met: f64,
    pub calories: f64,
    pub calories_per_minute: f64,
    pub equivalents: Vec<ActivityEquivalent>,
}

impl Calculator for CaloriesBurnedRequest {
    type Output = CaloriesBurnedReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<CaloriesBurnedReport, CalculatorError> {
        let activity = require(self.activity, "activity")?;
        let weight_kg = self.unit_system.weight_to_kg(require(self.weight, "weight")?);
        let minutes = require(self.duration_minutes, "duration_minutes")?;

        let met = activity.met();
        let calories = calculate_calories_burned(met, weight_kg, minutes);

        let equivalents = [
            ExerciseActivity::Walking,
            ExerciseActivity::Running,
            ExerciseActivity::Cycling,
            ExerciseActivity::Swimming,
        ]
        .into_iter()
        .filter(|other| *other != activity)
        .map(|other| ActivityEquivalent {
            activity: other,
            label: other.label(),
            minutes: round_to(minutes_to_burn(calories, other.met(), weight_kg), 0),
        })
        .collect();

        Ok(CaloriesBurnedReport {
            activity,
            label: activity.label(),
            met,
            calories: round_to(calories, 0),
            calories_per_minute: round_to(calories / minutes, 1),
            equivalents,
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

    #[test]
    fn test_calories_burned() {
        // Running 30 min at 70kg -> 9.8 * 70 * 0.5 = 343
        let kcal = calculate_calories_burned(9.8, 70.0, 30.0);
        assert!((kcal - 343.0).abs() < 1e-9);
    }

    #[test]
    fn test_report() {
        let request = CaloriesBurnedRequest {
            activity: Some(ExerciseActivity::Running),
            weight: Some(70.0),
            duration_minutes: Some(30.0),
            unit_system: UnitSystem::Metric,
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.calories, 343.0);
        assert_eq!(report.calories_per_minute, 11.4);
        assert_eq!(report.equivalents.len(), 3);
        // Walking needs 9.8 / 3.5 times longer
        let walking = &report.equivalents[0];
        assert_eq!(walking.activity, ExerciseActivity::Walking);
        assert_eq!(walking.minutes, 84.0);
    }

    #[test]
    fn test_missing_activity() {
        let request = CaloriesBurnedRequest {
            weight: Some(70.0),
            duration_minutes: Some(30.0),
            ..Default::default()
        };
        assert_eq!(
            request.compute(&ctx()).unwrap_err(),
            CalculatorError::MissingInput("activity".to_string())
        );
    }

    #[test]
    fn test_every_activity_has_positive_met() {
        assert!(ExerciseActivity::ALL.iter().all(|a| a.met() > 1.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Burn scales linearly with duration
        #[test]
        fn prop_calories_linear_in_duration(weight in 40.0f64..150.0, minutes in 1.0f64..180.0) {
            let single = calculate_calories_burned(7.0, weight, minutes);
            let double = calculate_calories_burned(7.0, weight, minutes * 2.0);
            prop_assert!((double - 2.0 * single).abs() < 1e-6);
        }
    }
}
