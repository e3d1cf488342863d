//! Menstrual cycle and pregnancy date calculators
//!
//! All dates are calendar dates; the evaluation date comes from
//! [`EvalContext`] so results are reproducible.

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::validation::require;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;
/// Luteal phase length; ovulation falls this many days before the next period
pub const LUTEAL_PHASE_DAYS: i64 = 14;
/// Naegele's rule: LMP to due date
pub const GESTATION_DAYS: i64 = 280;
/// Conception to due date
pub const CONCEPTION_TO_DUE_DAYS: i64 = 266;

/// `date` moved by `n` days; dates past the calendar limits are rejected
/// against `field`
fn shift(date: NaiveDate, n: i64, field: &str) -> Result<NaiveDate, CalculatorError> {
    date.checked_add_signed(Duration::days(n))
        .ok_or_else(|| CalculatorError::invalid(field, "is out of range"))
}

fn ensure_not_future(field: &str, date: NaiveDate, today: NaiveDate) -> Result<(), CalculatorError> {
    if date > today {
        return Err(CalculatorError::invalid(field, "cannot be in the future"));
    }
    Ok(())
}

// ============================================================================
// Ovulation
// ============================================================================

/// Key dates for one cycle starting at `period_start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OvulationDates {
    pub period_start: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub peak_fertility_start: NaiveDate,
    pub peak_fertility_end: NaiveDate,
    pub next_period: NaiveDate,
}

pub fn ovulation_dates(period_start: NaiveDate, cycle_length: u32) -> Result<OvulationDates, CalculatorError> {
    let cycle = cycle_length as i64;
    let ovulation_date = shift(period_start, cycle - LUTEAL_PHASE_DAYS, "last_period")?;
    Ok(OvulationDates {
        period_start,
        ovulation_date,
        fertile_window_start: shift(ovulation_date, -5, "last_period")?,
        fertile_window_end: ovulation_date,
        peak_fertility_start: shift(ovulation_date, -2, "last_period")?,
        peak_fertility_end: ovulation_date,
        next_period: shift(period_start, cycle, "last_period")?,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OvulationRequest {
    pub last_period: Option<NaiveDate>,
    #[validate(range(min = 20, max = 45, message = "must be between 20 and 45 days"))]
    pub cycle_length: Option<u32>,
    /// Number of future cycles to predict
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub cycles: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OvulationReport {
    pub cycle_length: u32,
    #[serde(flatten)]
    pub current: OvulationDates,
    pub upcoming: Vec<OvulationDates>,
}

impl Calculator for OvulationRequest {
    type Output = OvulationReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<OvulationReport, CalculatorError> {
        let last_period = require(self.last_period, "last_period")?;
        let cycle_length = self.cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH);

        let current = ovulation_dates(last_period, cycle_length)?;
        let upcoming = (1..=self.cycles.unwrap_or(0) as i64)
            .map(|n| {
                let start = shift(last_period, n * cycle_length as i64, "last_period")?;
                ovulation_dates(start, cycle_length)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OvulationReport {
            cycle_length,
            current,
            upcoming,
        })
    }
}

// ============================================================================
// Period cycle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    pub fn description(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "Period bleeding; energy may be lower",
            CyclePhase::Follicular => "Oestrogen rises and energy typically improves",
            CyclePhase::Ovulation => "Most fertile days of the cycle",
            CyclePhase::Luteal => "Progesterone rises; premenstrual symptoms may appear",
        }
    }
}

/// Phase for a 1-based day of the cycle
pub fn cycle_phase(day: u32, cycle_length: u32, period_length: u32) -> CyclePhase {
    let ovulation_day = cycle_length.saturating_sub(LUTEAL_PHASE_DAYS as u32);
    if day <= period_length {
        CyclePhase::Menstrual
    } else if day + 1 < ovulation_day {
        CyclePhase::Follicular
    } else if day <= ovulation_day + 1 {
        CyclePhase::Ovulation
    } else {
        CyclePhase::Luteal
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PhaseSpan {
    pub phase: CyclePhase,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub description: &'static str,
}

/// Phase date ranges for the cycle starting at `cycle_start`
pub fn phase_spans(
    cycle_start: NaiveDate,
    cycle_length: u32,
    period_length: u32,
) -> Result<Vec<PhaseSpan>, CalculatorError> {
    let mut spans: Vec<PhaseSpan> = Vec::new();
    for day in 1..=cycle_length {
        let phase = cycle_phase(day, cycle_length, period_length);
        let date = shift(cycle_start, day as i64 - 1, "last_period")?;
        match spans.last_mut() {
            Some(span) if span.phase == phase => span.end = date,
            _ => spans.push(PhaseSpan {
                phase,
                start: date,
                end: date,
                description: phase.description(),
            }),
        }
    }
    Ok(spans)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PeriodPrediction {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ovulation_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PeriodRequest {
    pub last_period: Option<NaiveDate>,
    #[validate(range(min = 20, max = 45, message = "must be between 20 and 45 days"))]
    pub cycle_length: Option<u32>,
    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10 days"))]
    pub period_length: Option<u32>,
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub cycles: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub cycle_length: u32,
    pub period_length: u32,
    pub current_cycle_start: NaiveDate,
    pub cycle_day: u32,
    pub current_phase: CyclePhase,
    pub days_until_next_period: i64,
    pub phases: Vec<PhaseSpan>,
    pub upcoming_periods: Vec<PeriodPrediction>,
}

impl Calculator for PeriodRequest {
    type Output = PeriodReport;

    fn compute(&self, ctx: &EvalContext) -> Result<PeriodReport, CalculatorError> {
        let last_period = require(self.last_period, "last_period")?;
        ensure_not_future("last_period", last_period, ctx.today)?;
        let cycle_length = self.cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH);
        let period_length = self.period_length.unwrap_or(DEFAULT_PERIOD_LENGTH);
        let cycles = self.cycles.unwrap_or(3);

        // Roll forward to the cycle that contains today
        let cycle = cycle_length as i64;
        let elapsed = (ctx.today - last_period).num_days();
        let current_cycle_start = shift(last_period, elapsed / cycle * cycle, "last_period")?;
        let cycle_day = (elapsed % cycle) as u32 + 1;

        let upcoming_periods = (1..=cycles as i64)
            .map(|n| {
                let start = shift(current_cycle_start, n * cycle, "last_period")?;
                Ok(PeriodPrediction {
                    start,
                    end: shift(start, period_length as i64 - 1, "last_period")?,
                    ovulation_date: shift(start, cycle - LUTEAL_PHASE_DAYS, "last_period")?,
                })
            })
            .collect::<Result<Vec<_>, CalculatorError>>()?;

        Ok(PeriodReport {
            cycle_length,
            period_length,
            current_cycle_start,
            cycle_day,
            current_phase: cycle_phase(cycle_day, cycle_length, period_length),
            days_until_next_period: cycle - (cycle_day as i64 - 1),
            phases: phase_spans(current_cycle_start, cycle_length, period_length)?,
            upcoming_periods,
        })
    }
}

// ============================================================================
// Pregnancy
// ============================================================================

/// Due date by Naegele's rule, shifted for cycles longer or shorter than 28 days
pub fn due_date_from_lmp(lmp: NaiveDate, cycle_length: u32) -> Result<NaiveDate, CalculatorError> {
    let offset = GESTATION_DAYS + cycle_length as i64 - DEFAULT_CYCLE_LENGTH as i64;
    shift(lmp, offset, "last_period")
}

pub fn due_date_from_conception(conception: NaiveDate) -> Result<NaiveDate, CalculatorError> {
    shift(conception, CONCEPTION_TO_DUE_DAYS, "conception_date")
}

pub fn trimester(weeks: i64) -> u8 {
    if weeks < 13 {
        1
    } else if weeks < 27 {
        2
    } else {
        3
    }
}

/// Weeks of gestational age; the due date itself is appended from the report
const MILESTONES: [(i64, &str); 5] = [
    (12, "End of first trimester"),
    (20, "Anatomy scan"),
    (24, "Glucose screening window opens"),
    (27, "Third trimester begins"),
    (37, "Full term"),
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PregnancyMilestone {
    pub week: i64,
    pub title: &'static str,
    pub date: NaiveDate,
    pub reached: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PregnancyRequest {
    /// First day of the last menstrual period
    pub last_period: Option<NaiveDate>,
    /// Used when the last period is unknown
    pub conception_date: Option<NaiveDate>,
    #[validate(range(min = 20, max = 45, message = "must be between 20 and 45 days"))]
    pub cycle_length: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PregnancyReport {
    pub due_date: NaiveDate,
    pub estimated_conception: NaiveDate,
    pub weeks: i64,
    pub days: i64,
    pub trimester: u8,
    pub days_remaining: i64,
    pub progress_percent: f64,
    pub milestones: Vec<PregnancyMilestone>,
}

impl Calculator for PregnancyRequest {
    type Output = PregnancyReport;

    fn compute(&self, ctx: &EvalContext) -> Result<PregnancyReport, CalculatorError> {
        // Gestational age counts from the LMP, or two weeks before conception
        let (gestation_start, due_date, field) = match (self.last_period, self.conception_date) {
            (Some(lmp), _) => {
                ensure_not_future("last_period", lmp, ctx.today)?;
                let due = due_date_from_lmp(lmp, self.cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH))?;
                (lmp, due, "last_period")
            }
            (None, Some(conception)) => {
                ensure_not_future("conception_date", conception, ctx.today)?;
                let start = shift(conception, CONCEPTION_TO_DUE_DAYS - GESTATION_DAYS, "conception_date")?;
                (start, due_date_from_conception(conception)?, "conception_date")
            }
            (None, None) => return Err(CalculatorError::MissingInput("last_period".to_string())),
        };

        let elapsed = (ctx.today - gestation_start).num_days().max(0);
        if elapsed > 44 * 7 {
            return Err(CalculatorError::invalid(field, "is too long ago for a current pregnancy"));
        }
        let weeks = elapsed / 7;

        let mut milestones = MILESTONES
            .iter()
            .map(|&(week, title)| {
                let date = shift(gestation_start, week * 7, field)?;
                Ok(PregnancyMilestone {
                    week,
                    title,
                    date,
                    reached: date <= ctx.today,
                })
            })
            .collect::<Result<Vec<_>, CalculatorError>>()?;
        milestones.push(PregnancyMilestone {
            week: 40,
            title: "Due date",
            date: due_date,
            reached: due_date <= ctx.today,
        });

        Ok(PregnancyReport {
            due_date,
            estimated_conception: shift(due_date, -CONCEPTION_TO_DUE_DAYS, field)?,
            weeks,
            days: elapsed % 7,
            trimester: trimester(weeks),
            days_remaining: (due_date - ctx.today).num_days().max(0),
            progress_percent: crate::units::round_to(
                (elapsed as f64 / GESTATION_DAYS as f64 * 100.0).min(100.0),
                1,
            ),
            milestones,
        })
    }
}
