//! Input validation helpers
//!
//! Range checks are declared on the request records with the `validator`
//! derive. The helpers here cover what the derive cannot express: required
//! form fields, clock-time parsing and user-facing field labels.

use crate::errors::CalculatorError;
use chrono::NaiveTime;

/// Unwrap a required form field
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, CalculatorError> {
    value.ok_or_else(|| CalculatorError::MissingInput(field.to_string()))
}

/// Parse an `HH:MM` (or `HH:MM:SS`) clock time
pub fn parse_clock_time(field: &str, value: &str) -> Result<NaiveTime, CalculatorError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| CalculatorError::invalid(field, "Invalid time format. Use HH:MM"))
}

/// Format a clock time for display
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Reject zero, negative and non-finite values
pub fn ensure_positive(field: &str, value: f64, message: &str) -> Result<f64, CalculatorError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalculatorError::invalid(field, message))
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" => "Weight",
        "height" => "Height",
        "age" => "Age",
        "sex" => "Gender",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "waist" => "Waist Circumference",
        "neck" => "Neck Circumference",
        "hip" => "Hip Circumference",
        "body_fat_percent" => "Body Fat %",
        "resting_heart_rate" => "Resting Heart Rate",
        "activity" => "Activity",
        "duration_minutes" => "Duration",
        "exercise_minutes" => "Daily Exercise",
        "calorie_intake" => "Daily Calories",
        "time" => "Time",
        "target_hours" => "Sleep Goal",
        "nights" => "Hours Slept",
        "current_hours" => "Current Sleep",
        "first_meal" => "First Meal",
        "fasting_hours" => "Fasting Hours",
        "last_period" => "First Day of Last Period",
        "conception_date" => "Conception Date",
        "cycle_length" => "Cycle Length",
        "period_length" => "Period Length",
        "cycles" => "Cycles to Predict",
        "family_history" => "Family History",
        "ethnicity" => "Ethnicity",
        "today" => "Date",
        "unit" => "Unit",
        _ => field_name,
    }
}

/// Format an error as a message suitable for showing next to a form
pub fn user_message(err: &CalculatorError) -> String {
    match err {
        CalculatorError::MissingInput(field) => {
            format!("{} is required", field_display_label(field))
        }
        CalculatorError::Invalid { field, message } => {
            format!("{}: {}", field_display_label(field), message)
        }
        other => other.to_string(),
    }
}
