//! Intermittent fasting windows

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::units::round_to;
use crate::validation::{format_clock_time, parse_clock_time, require};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Daily time-restricted eating protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FastingProtocol {
    #[serde(rename = "12:12")]
    TwelveTwelve,
    #[serde(rename = "14:10")]
    FourteenTen,
    #[default]
    #[serde(rename = "16:8")]
    SixteenEight,
    #[serde(rename = "18:6")]
    EighteenSix,
    #[serde(rename = "20:4")]
    TwentyFour,
    #[serde(rename = "omad")]
    OneMealADay,
    #[serde(rename = "custom")]
    Custom,
}

impl FastingProtocol {
    /// Fasting hours for the fixed protocols
    pub fn fasting_hours(&self) -> Option<u32> {
        match self {
            FastingProtocol::TwelveTwelve => Some(12),
            FastingProtocol::FourteenTen => Some(14),
            FastingProtocol::SixteenEight => Some(16),
            FastingProtocol::EighteenSix => Some(18),
            FastingProtocol::TwentyFour => Some(20),
            FastingProtocol::OneMealADay => Some(23),
            FastingProtocol::Custom => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FastingProtocol::TwelveTwelve => "12:12 (beginner)",
            FastingProtocol::FourteenTen => "14:10",
            FastingProtocol::SixteenEight => "16:8 (Leangains)",
            FastingProtocol::EighteenSix => "18:6",
            FastingProtocol::TwentyFour => "20:4 (Warrior diet)",
            FastingProtocol::OneMealADay => "OMAD (23:1)",
            FastingProtocol::Custom => "Custom",
        }
    }
}

/// Eating and fasting boundaries for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastingWindow {
    pub eating_start: NaiveTime,
    pub eating_end: NaiveTime,
}

/// The eating window opens at the first meal and closes after `24 - fasting_hours`
pub fn fasting_window(first_meal: NaiveTime, fasting_hours: u32) -> FastingWindow {
    let eating_hours = 24 - fasting_hours.min(24);
    FastingWindow {
        eating_start: first_meal,
        eating_end: first_meal + Duration::hours(eating_hours as i64),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FastingRequest {
    pub protocol: FastingProtocol,
    /// Only read for the custom protocol
    #[validate(range(min = 12, max = 23, message = "must be between 12 and 23 hours"))]
    pub fasting_hours: Option<u32>,
    /// Time of the first meal as `HH:MM`
    pub first_meal: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FastingReport {
    pub protocol: FastingProtocol,
    pub protocol_label: &'static str,
    pub fasting_hours: u32,
    pub eating_hours: u32,
    pub eating_window_start: String,
    pub eating_window_end: String,
    /// Fasting starts when the eating window closes
    pub fasting_start: String,
    /// and ends with the next day's first meal
    pub fasting_end: String,
    pub fasting_percent: f64,
    pub eating_percent: f64,
    pub tips: Vec<&'static str>,
}

impl Calculator for FastingRequest {
    type Output = FastingReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<FastingReport, CalculatorError> {
        let raw = require(self.first_meal.as_deref(), "first_meal")?;
        let first_meal = parse_clock_time("first_meal", raw)?;
        let fasting_hours = match self.protocol.fasting_hours() {
            Some(hours) => hours,
            None => require(self.fasting_hours, "fasting_hours")?,
        };

        let window = fasting_window(first_meal, fasting_hours);
        let eating_hours = 24 - fasting_hours;

        let mut tips = vec![
            "Drink water, black coffee or plain tea during the fast",
            "Break your fast with a balanced, protein-rich meal",
        ];
        if fasting_hours >= 18 {
            tips.push("Longer fasts are not suitable during pregnancy or with a history of eating disorders");
        }

        Ok(FastingReport {
            protocol: self.protocol,
            protocol_label: self.protocol.label(),
            fasting_hours,
            eating_hours,
            eating_window_start: format_clock_time(window.eating_start),
            eating_window_end: format_clock_time(window.eating_end),
            fasting_start: format_clock_time(window.eating_end),
            fasting_end: format_clock_time(window.eating_start),
            fasting_percent: round_to(fasting_hours as f64 / 24.0 * 100.0, 1),
            eating_percent: round_to(eating_hours as f64 / 24.0 * 100.0, 1),
            tips,
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

    #[test]
    fn test_sixteen_eight() {
        let request = FastingRequest {
            protocol: FastingProtocol::SixteenEight,
            fasting_hours: None,
            first_meal: Some("12:00".to_string()),
        };
        let report = request.compute(&ctx()).unwrap();
        assert_eq!(report.eating_window_start, "12:00");
        assert_eq!(report.eating_window_end, "20:00");
        assert_eq!(report.fasting_start, "20:00");
        assert_eq!(report.fasting_end, "12:00");
        assert_eq!(report.fasting_percent, 66.7);
        assert_eq!(report.eating_percent, 33.3);
    }

    #[test]
    fn test_window_wraps_past_midnight() {
        let window = fasting_window(NaiveTime::from_hms_opt(20, 0, 0).unwrap(), 18);
        assert_eq!(window.eating_end, NaiveTime::from_hms_opt(2, 0, 0).unwrap());
    }

    #[test]
    fn test_custom_requires_hours() {
        let request = FastingRequest {
            protocol: FastingProtocol::Custom,
            fasting_hours: None,
            first_meal: Some("10:00".to_string()),
        };
        assert_eq!(
            request.compute(&ctx()).unwrap_err(),
            CalculatorError::MissingInput("fasting_hours".to_string())
        );
    }

    #[test]
    fn test_protocol_parses_from_ratio() {
        let protocol: FastingProtocol = serde_json::from_str("\"18:6\"").unwrap();
        assert_eq!(protocol, FastingProtocol::EighteenSix);
    }

    #[rstest]
    #[case(FastingProtocol::TwelveTwelve, 12)]
    #[case(FastingProtocol::FourteenTen, 14)]
    #[case(FastingProtocol::SixteenEight, 16)]
    #[case(FastingProtocol::EighteenSix, 18)]
    #[case(FastingProtocol::TwentyFour, 20)]
    #[case(FastingProtocol::OneMealADay, 23)]
    fn test_protocol_hours(#[case] protocol: FastingProtocol, #[case] hours: u32) {
        assert_eq!(protocol.fasting_hours(), Some(hours));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Fasting and eating split always covers the whole day
        #[test]
        fn prop_split_covers_day(hours in 12u32..=23, h in 0u32..24) {
            let request = FastingRequest {
                protocol: FastingProtocol::Custom,
                fasting_hours: Some(hours),
                first_meal: Some(format!("{:02}:00", h)),
            };
            let report = request.compute(&ctx()).unwrap();
            prop_assert_eq!(report.fasting_hours + report.eating_hours, 24);
            prop_assert!((report.fasting_percent + report.eating_percent - 100.0).abs() < 0.11);
        }
    }
}
