//! Heart-rate training zones (Karvonen method)
//!
//! maxHR = 220 - age, HRR = maxHR - restingHR, and each zone bound is
//! restingHR + HRR × intensity.

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::validation::require;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Estimated maximum heart rate
pub fn max_heart_rate(age_years: u32) -> i32 {
    220 - age_years as i32
}

/// Heart-rate reserve
pub fn heart_rate_reserve(max_hr: i32, resting_hr: i32) -> i32 {
    max_hr - resting_hr
}

/// Target heart rate at an intensity (0.0-1.0)
pub fn karvonen_target(resting_hr: i32, reserve: i32, intensity: f64) -> f64 {
    resting_hr as f64 + reserve as f64 * intensity
}

/// Training zone definitions, lowest intensity first
const ZONES: [(&str, f64, f64, &str); 5] = [
    ("Recovery", 0.50, 0.60, "Very light effort for warm-ups, cool-downs and active recovery"),
    ("Fat Burn", 0.60, 0.70, "Comfortable pace that builds base endurance and burns fat"),
    ("Aerobic", 0.70, 0.80, "Moderate effort that improves cardiovascular fitness"),
    ("Anaerobic", 0.80, 0.90, "Hard effort that raises lactate threshold and speed"),
    ("Maximum", 0.90, 1.00, "All-out effort for short intervals only"),
];

/// One training zone
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeartRateZone {
    pub zone: u8,
    pub name: &'static str,
    pub min_bpm: i32,
    pub max_bpm: i32,
    pub min_percent: u32,
    pub max_percent: u32,
    pub description: &'static str,
}

/// Build the five Karvonen zones from 50% to 100% of reserve
pub fn calculate_zones(max_hr: i32, resting_hr: i32) -> Vec<HeartRateZone> {
    let reserve = heart_rate_reserve(max_hr, resting_hr);
    ZONES
        .iter()
        .enumerate()
        .map(|(i, (name, low, high, description))| HeartRateZone {
            zone: i as u8 + 1,
            name: *name,
            min_bpm: karvonen_target(resting_hr, reserve, *low).round() as i32,
            max_bpm: karvonen_target(resting_hr, reserve, *high).round() as i32,
            min_percent: (low * 100.0).round() as u32,
            max_percent: (high * 100.0).round() as u32,
            description: *description,
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HeartRateRequest {
    #[validate(range(min = 1, max = 120, message = "must be between 1 and 120"))]
    pub age: Option<u32>,
    #[validate(range(min = 30, max = 120, message = "must be between 30 and 120 bpm"))]
    pub resting_heart_rate: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeartRateReport {
    pub max_heart_rate: i32,
    pub resting_heart_rate: i32,
    pub heart_rate_reserve: i32,
    pub zones: Vec<HeartRateZone>,
}

impl Calculator for HeartRateRequest {
    type Output = HeartRateReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<HeartRateReport, CalculatorError> {
        let age = require(self.age, "age")?;
        let resting = require(self.resting_heart_rate, "resting_heart_rate")?;

        let max_hr = max_heart_rate(age);
        if resting >= max_hr {
            return Err(CalculatorError::invalid(
                "resting_heart_rate",
                "must be below the estimated maximum heart rate",
            ));
        }

        Ok(HeartRateReport {
            max_heart_rate: max_hr,
            resting_heart_rate: resting,
            heart_rate_reserve: heart_rate_reserve(max_hr, resting),
            zones: calculate_zones(max_hr, resting),
        })
    }
}
