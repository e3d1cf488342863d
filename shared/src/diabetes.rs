//! Type 2 diabetes risk score
//!
//! An additive point score over age, sex, BMI, waist circumference and
//! medical history. Screening aid only; not a diagnosis.

use crate::calculator::{Calculator, EvalContext};
use crate::errors::CalculatorError;
use crate::health_metrics::{calculate_bmi, BiologicalSex};
use crate::units::{round_to, UnitSystem};
use crate::validation::require;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Ethnicity {
    White,
    Black,
    Hispanic,
    SouthAsian,
    EastAsian,
    NativeAmerican,
    PacificIslander,
    Other,
    #[default]
    PreferNotToSay,
}

impl Ethnicity {
    /// Groups with a documented higher prevalence of type 2 diabetes
    pub fn is_higher_risk(&self) -> bool {
        matches!(
            self,
            Ethnicity::Black
                | Ethnicity::Hispanic
                | Ethnicity::SouthAsian
                | Ethnicity::EastAsian
                | Ethnicity::NativeAmerican
                | Ethnicity::PacificIslander
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Very High Risk")]
    VeryHigh,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=2 => RiskLevel::Low,
            3..=4 => RiskLevel::Moderate,
            5..=8 => RiskLevel::High,
            _ => RiskLevel::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::VeryHigh => "Very High Risk",
        }
    }

    pub fn recommendations(&self) -> Vec<&'static str> {
        match self {
            RiskLevel::Low => vec![
                "Keep up a balanced diet and regular activity",
                "Recheck your risk every few years",
            ],
            RiskLevel::Moderate => vec![
                "Aim for at least 150 minutes of moderate activity per week",
                "Cut back on sugary drinks and refined carbohydrates",
                "Ask your doctor about a fasting glucose test",
            ],
            RiskLevel::High => vec![
                "See your doctor for an HbA1c or fasting glucose test",
                "Losing 5-7% of body weight substantially lowers risk",
                "Consider a structured diabetes prevention programme",
            ],
            RiskLevel::VeryHigh => vec![
                "Book a blood glucose test with your doctor soon",
                "Ask about a diabetes prevention programme and lifestyle support",
                "Monitor blood pressure and cholesterol as well",
            ],
        }
    }
}

pub fn age_points(age_years: u32) -> u32 {
    match age_years {
        0..=39 => 0,
        40..=49 => 1,
        50..=59 => 2,
        _ => 3,
    }
}

pub fn bmi_points(bmi: f64) -> u32 {
    if bmi < 25.0 {
        0
    } else if bmi < 30.0 {
        1
    } else if bmi < 40.0 {
        2
    } else {
        3
    }
}

pub fn waist_points(waist_cm: f64, sex: BiologicalSex) -> u32 {
    let (lower, upper) = match sex {
        BiologicalSex::Male => (94.0, 102.0),
        BiologicalSex::Female => (80.0, 88.0),
    };
    if waist_cm < lower {
        0
    } else if waist_cm <= upper {
        1
    } else {
        2
    }
}

/// One scored input
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiskFactor {
    pub name: &'static str,
    pub points: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DiabetesRiskRequest {
    #[validate(range(min = 18, max = 120, message = "must be between 18 and 120"))]
    pub age: Option<u32>,
    pub sex: Option<BiologicalSex>,
    #[validate(range(min = 1.0, max = 1500.0, message = "must be between 1 and 1500"))]
    pub weight: Option<f64>,
    #[validate(range(min = 1.0, max = 300.0, message = "must be between 1 and 300"))]
    pub height: Option<f64>,
    #[validate(range(min = 1.0, max = 300.0, message = "must be between 1 and 300"))]
    pub waist: Option<f64>,
    pub family_history: bool,
    pub physically_inactive: bool,
    pub high_blood_pressure: bool,
    pub gestational_diabetes: bool,
    pub ethnicity: Ethnicity,
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiabetesRiskReport {
    pub score: u32,
    pub max_score: u32,
    pub risk_level: RiskLevel,
    pub bmi: f64,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<&'static str>,
    pub disclaimer: &'static str,
}

/// Highest reachable score: 3 age + 3 BMI + 2 waist + 4 history flags, plus
/// either the male point or the gestational point
pub const MAX_SCORE: u32 = 13;

impl Calculator for DiabetesRiskRequest {
    type Output = DiabetesRiskReport;

    fn compute(&self, _ctx: &EvalContext) -> Result<DiabetesRiskReport, CalculatorError> {
        let age = require(self.age, "age")?;
        let sex = require(self.sex, "sex")?;
        let weight_kg = self.unit_system.weight_to_kg(require(self.weight, "weight")?);
        let height_cm = self.unit_system.length_to_cm(require(self.height, "height")?);
        let bmi = calculate_bmi(weight_kg, height_cm);

        let mut factors = vec![
            RiskFactor {
                name: "Age",
                points: age_points(age),
                explanation: format!("Age {} years; risk rises from 40 onwards", age),
            },
            RiskFactor {
                name: "Sex",
                points: u32::from(sex == BiologicalSex::Male),
                explanation: "Men develop type 2 diabetes at a lower BMI than women".to_string(),
            },
            RiskFactor {
                name: "BMI",
                points: bmi_points(bmi),
                explanation: format!("BMI {:.1}; excess weight increases insulin resistance", bmi),
            },
        ];

        if let Some(waist) = self.waist {
            let waist_cm = self.unit_system.length_to_cm(waist);
            factors.push(RiskFactor {
                name: "Waist circumference",
                points: waist_points(waist_cm, sex),
                explanation: format!("{:.0} cm; abdominal fat is strongly linked to diabetes", waist_cm),
            });
        }

        let flags = [
            (self.family_history, "Family history", "A parent or sibling with diabetes"),
            (self.physically_inactive, "Physical inactivity", "Less than 150 minutes of activity per week"),
            (self.high_blood_pressure, "High blood pressure", "Diagnosed or treated hypertension"),
            (
                self.gestational_diabetes && sex == BiologicalSex::Female,
                "Gestational diabetes",
                "Diabetes during a previous pregnancy",
            ),
            (self.ethnicity.is_higher_risk(), "Ethnicity", "Ethnic background with higher prevalence"),
        ];
        factors.extend(flags.into_iter().filter(|(set, _, _)| *set).map(|(_, name, explanation)| RiskFactor {
            name,
            points: 1,
            explanation: explanation.to_string(),
        }));

        let score = factors.iter().map(|f| f.points).sum();
        let risk_level = RiskLevel::from_score(score);

        Ok(DiabetesRiskReport {
            score,
            max_score: MAX_SCORE,
            risk_level,
            bmi: round_to(bmi, 1),
            factors,
            recommendations: risk_level.recommendations(),
            disclaimer: "This score estimates risk only. Only a blood test can diagnose diabetes.",
        })
    }
}
