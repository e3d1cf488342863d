//! Sleep calculators: cycle timing, sleep debt and recommended duration

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::units::round_to;
use crate::validation::{format_clock_time, parse_clock_time, require};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Length of one sleep cycle
pub const SLEEP_CYCLE_MINUTES: i64 = 90;
/// Average time it takes to fall asleep
pub const FALL_ASLEEP_MINUTES: i64 = 15;
/// Cycle counts offered, best first
pub const SUGGESTED_CYCLES: [u32; 3] = [6, 5, 4];

// ============================================================================
// Sleep cycle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SleepCycleMode {
    /// Given a wake-up time, when to go to bed
    #[default]
    WakeAt,
    /// Given a bedtime, when to wake up
    BedAt,
}

/// Bedtime that lets `cycles` full cycles finish by `wake`
pub fn bedtime_for(wake: NaiveTime, cycles: u32) -> NaiveTime {
    wake - Duration::minutes(FALL_ASLEEP_MINUTES + cycles as i64 * SLEEP_CYCLE_MINUTES)
}

/// Wake time after `cycles` full cycles starting at `bed`
pub fn wake_time_for(bed: NaiveTime, cycles: u32) -> NaiveTime {
    bed + Duration::minutes(FALL_ASLEEP_MINUTES + cycles as i64 * SLEEP_CYCLE_MINUTES)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SleepCycleRequest {
    pub mode: SleepCycleMode,
    /// Wake or bed time as `HH:MM`, depending on mode
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SleepTimeOption {
    pub cycles: u32,
    pub time: String,
    pub sleep_hours: f64,
    pub quality: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SleepCycleReport {
    pub mode: SleepCycleMode,
    pub reference_time: String,
    pub options: Vec<SleepTimeOption>,
    pub fall_asleep_minutes: i64,
}

impl Calculator for SleepCycleRequest {
    type Output = SleepCycleReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<SleepCycleReport, CalculatorError> {
        let raw = require(self.time.as_deref(), "time")?;
        let reference = parse_clock_time("time", raw)?;

        let options = SUGGESTED_CYCLES
            .iter()
            .map(|&cycles| {
                let time = match self.mode {
                    SleepCycleMode::WakeAt => bedtime_for(reference, cycles),
                    SleepCycleMode::BedAt => wake_time_for(reference, cycles),
                };
                SleepTimeOption {
                    cycles,
                    time: format_clock_time(time),
                    sleep_hours: cycles as f64 * SLEEP_CYCLE_MINUTES as f64 / 60.0,
                    quality: if cycles >= 5 { "Optimal" } else { "Minimum" },
                }
            })
            .collect();

        Ok(SleepCycleReport {
            mode: self.mode,
            reference_time: format_clock_time(reference),
            options,
            fall_asleep_minutes: FALL_ASLEEP_MINUTES,
        })
    }
}

// ============================================================================
// Recommended duration
// ============================================================================

/// National Sleep Foundation age group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SleepRecommendation {
    pub age_group: &'static str,
    pub min_hours: f64,
    pub max_hours: f64,
}

impl SleepRecommendation {
    pub fn midpoint(&self) -> f64 {
        (self.min_hours + self.max_hours) / 2.0
    }
}

/// Recommended nightly sleep for an age in years
pub fn recommended_sleep(age_years: f64) -> SleepRecommendation {
    let (age_group, min_hours, max_hours) = if age_years < 0.25 {
        ("Newborn (0-3 months)", 14.0, 17.0)
    } else if age_years < 1.0 {
        ("Infant (4-11 months)", 12.0, 15.0)
    } else if age_years < 3.0 {
        ("Toddler (1-2 years)", 11.0, 14.0)
    } else if age_years < 6.0 {
        ("Preschool (3-5 years)", 10.0, 13.0)
    } else if age_years < 14.0 {
        ("School age (6-13 years)", 9.0, 11.0)
    } else if age_years < 18.0 {
        ("Teenager (14-17 years)", 8.0, 10.0)
    } else if age_years < 26.0 {
        ("Young adult (18-25 years)", 7.0, 9.0)
    } else if age_years < 65.0 {
        ("Adult (26-64 years)", 7.0, 9.0)
    } else {
        ("Older adult (65+ years)", 7.0, 8.0)
    };
    SleepRecommendation { age_group, min_hours, max_hours }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepAssessment {
    Below,
    Within,
    Above,
}

pub fn assess_sleep(hours: f64, recommendation: &SleepRecommendation) -> SleepAssessment {
    if hours < recommendation.min_hours {
        SleepAssessment::Below
    } else if hours > recommendation.max_hours {
        SleepAssessment::Above
    } else {
        SleepAssessment::Within
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SleepLengthRequest {
    /// Age in years; fractions allowed for infants
    #[validate(range(min = 0.0, max = 120.0, message = "must be between 0 and 120"))]
    pub age: Option<f64>,
    #[validate(range(min = 0.0, max = 24.0, message = "must be between 0 and 24 hours"))]
    pub current_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SleepLengthReport {
    pub recommendation: SleepRecommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<SleepAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Calculator for SleepLengthRequest {
    type Output = SleepLengthReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<SleepLengthReport, CalculatorError> {
        let age = require(self.age, "age")?;
        let recommendation = recommended_sleep(age);

        let assessment = self.current_hours.map(|hours| assess_sleep(hours, &recommendation));
        let message = assessment.map(|a| match a {
            SleepAssessment::Below => format!(
                "You are sleeping less than the {}-{} hours recommended for your age",
                recommendation.min_hours, recommendation.max_hours
            ),
            SleepAssessment::Within => "Your sleep is within the recommended range".to_string(),
            SleepAssessment::Above => format!(
                "You are sleeping more than the {}-{} hours recommended for your age",
                recommendation.min_hours, recommendation.max_hours
            ),
        });

        Ok(SleepLengthReport {
            recommendation,
            assessment,
            message,
        })
    }
}

// ============================================================================
// Sleep debt
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtSeverity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl DebtSeverity {
    pub fn from_hours(debt_hours: f64) -> Self {
        if debt_hours <= 0.0 {
            DebtSeverity::None
        } else if debt_hours < 5.0 {
            DebtSeverity::Mild
        } else if debt_hours < 10.0 {
            DebtSeverity::Moderate
        } else {
            DebtSeverity::Severe
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            DebtSeverity::None => "You are getting enough sleep. Keep a consistent schedule.",
            DebtSeverity::Mild => "Add an extra hour of sleep for a few nights to catch up.",
            DebtSeverity::Moderate => "Go to bed earlier for the next week and limit caffeine after noon.",
            DebtSeverity::Severe => "Prioritise recovery sleep and talk to a doctor if tiredness persists.",
        }
    }
}

/// Net sleep debt; nights above target offset nights below it
pub fn sleep_debt_hours(target_hours: f64, nights: &[f64]) -> f64 {
    nights.iter().map(|actual| target_hours - actual).sum::<f64>().max(0.0)
}

/// Nights needed to repay the debt with one extra hour per night
pub fn recovery_nights(debt_hours: f64) -> u32 {
    debt_hours.ceil() as u32
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SleepDebtRequest {
    #[validate(range(min = 4.0, max = 12.0, message = "must be between 4 and 12 hours"))]
    pub target_hours: Option<f64>,
    /// Used to pick a target when none is given
    #[validate(range(min = 0.0, max = 120.0, message = "must be between 0 and 120"))]
    pub age: Option<f64>,
    /// Hours slept on each recent night
    #[validate(length(max = 30, message = "at most 30 nights"))]
    pub nights: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SleepDebtReport {
    pub target_hours: f64,
    pub nights_tracked: usize,
    pub average_hours: f64,
    pub nightly_deficits: Vec<f64>,
    pub debt_hours: f64,
    pub severity: DebtSeverity,
    pub recovery_nights: u32,
    pub advice: &'static str,
}

impl Calculator for SleepDebtRequest {
    type Output = SleepDebtReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<SleepDebtReport, CalculatorError> {
        let target = match (self.target_hours, self.age) {
            (Some(target), _) => target,
            (None, Some(age)) => recommended_sleep(age).midpoint(),
            (None, None) => return Err(CalculatorError::MissingInput("target_hours".to_string())),
        };
        if self.nights.is_empty() {
            return Err(CalculatorError::MissingInput("nights".to_string()));
        }
        if self.nights.iter().any(|h| !(0.0..=24.0).contains(h)) {
            return Err(CalculatorError::invalid("nights", "each night must be between 0 and 24 hours"));
        }

        let debt = sleep_debt_hours(target, &self.nights);
        let severity = DebtSeverity::from_hours(debt);
        let average = self.nights.iter().sum::<f64>() / self.nights.len() as f64;

        Ok(SleepDebtReport {
            target_hours: target,
            nights_tracked: self.nights.len(),
            average_hours: round_to(average, 1),
            nightly_deficits: self.nights.iter().map(|h| round_to(target - h, 1)).collect(),
            debt_hours: round_to(debt, 1),
            severity,
            recovery_nights: recovery_nights(debt),
            advice: severity.advice(),
        })
    }
}
