//! Unit conversion and normalization module
//!
//! Calculator forms accept metric or imperial measurements. Everything is
//! converted to kilograms and centimeters before a formula runs, and
//! converted back only when a result is presented in the caller's units.

use crate::errors::CalculatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const KG_PER_LB: f64 = 0.453592;
pub const KG_PER_STONE: f64 = 6.35029;
pub const CM_PER_INCH: f64 = 2.54;

fn unknown_unit(kind: &str, s: &str) -> CalculatorError {
    CalculatorError::invalid("unit", format!("unknown {} unit '{}'", kind, s))
}

/// Weight unit a result is presented in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
    Stone,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
            WeightUnit::Stone => value * KG_PER_STONE,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / KG_PER_LB,
            WeightUnit::Stone => kg / KG_PER_STONE,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
            WeightUnit::Stone => "st",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for WeightUnit {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            "st" | "stone" | "stones" => Ok(WeightUnit::Stone),
            _ => Err(unknown_unit("weight", s)),
        }
    }
}

/// Height and body-circumference unit
///
/// `FeetInches` values are total inches; only the display differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeightUnit {
    #[default]
    Cm,
    Meters,
    Inches,
    FeetInches,
}

impl HeightUnit {
    /// Convert from this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value,
            HeightUnit::Meters => value * 100.0,
            HeightUnit::Inches | HeightUnit::FeetInches => value * CM_PER_INCH,
        }
    }

    /// Convert from centimeters to this unit
    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            HeightUnit::Cm => cm,
            HeightUnit::Meters => cm / 100.0,
            HeightUnit::Inches | HeightUnit::FeetInches => cm / CM_PER_INCH,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Meters => "m",
            HeightUnit::Inches => "in",
            HeightUnit::FeetInches => "ft/in",
        }
    }

    /// Human-readable height, e.g. `175 cm` or `5'9"`
    pub fn format(&self, cm: f64) -> String {
        match self {
            HeightUnit::Cm => format!("{:.0} cm", cm),
            HeightUnit::Meters => format!("{:.2} m", cm / 100.0),
            HeightUnit::Inches => format!("{:.0} in", cm / CM_PER_INCH),
            HeightUnit::FeetInches => FeetInchesHeight::from_cm(cm).to_string(),
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for HeightUnit {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "m" | "meter" | "meters" => Ok(HeightUnit::Meters),
            "in" | "inch" | "inches" => Ok(HeightUnit::Inches),
            "ft" | "feet" | "ft/in" | "feet_inches" => Ok(HeightUnit::FeetInches),
            _ => Err(unknown_unit("height", s)),
        }
    }
}

/// Whole feet and inches, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeetInchesHeight {
    pub feet: u32,
    pub inches: u32,
}

impl FeetInchesHeight {
    pub fn from_cm(cm: f64) -> Self {
        // Round before splitting so 5'11.7" shows as 6'0"
        let total = (cm / CM_PER_INCH).round().max(0.0) as u32;
        Self {
            feet: total / 12,
            inches: total % 12,
        }
    }
}

impl fmt::Display for FeetInchesHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}

// ============================================================================
// Unit System
// ============================================================================

/// Measurement system selected on a calculator form
///
/// Metric forms take kilograms and centimeters, imperial forms take pounds
/// and inches, UK forms take stone and inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
    Uk,
}

impl UnitSystem {
    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kg,
            UnitSystem::Imperial => WeightUnit::Lbs,
            UnitSystem::Uk => WeightUnit::Stone,
        }
    }

    pub fn length_unit(&self) -> HeightUnit {
        match self {
            UnitSystem::Metric => HeightUnit::Cm,
            UnitSystem::Imperial | UnitSystem::Uk => HeightUnit::FeetInches,
        }
    }

    /// Convert a weight entered in this system to kilograms
    pub fn weight_to_kg(&self, value: f64) -> f64 {
        self.weight_unit().to_kg(value)
    }

    /// Convert a height or circumference entered in this system to centimeters
    pub fn length_to_cm(&self, value: f64) -> f64 {
        self.length_unit().to_cm(value)
    }

    /// Convert kilograms back to this system's weight unit
    pub fn weight_from_kg(&self, kg: f64) -> f64 {
        self.weight_unit().from_kg(kg)
    }

    pub fn format_height(&self, cm: f64) -> String {
        self.length_unit().format(cm)
    }
}

// ============================================================================
// Presentation Rounding
// ============================================================================

/// Round to a fixed number of decimal places for display
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
