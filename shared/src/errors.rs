//! Error types for the health calculators

use thiserror::Error;

/// Errors produced while turning form input into a calculator result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Invalid {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("Unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl CalculatorError {
    /// Build an `Invalid` error for a field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        CalculatorError::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// The offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            CalculatorError::MissingInput(field) => Some(field),
            CalculatorError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CalculatorError {
    fn from(err: serde_json::Error) -> Self {
        CalculatorError::MalformedInput(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CalculatorError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors(&errors, &mut fields);
        // HashMap order is unstable; report the first field alphabetically
        fields.sort();

        match fields.into_iter().next() {
            Some((field, message)) => CalculatorError::Invalid { field, message },
            None => CalculatorError::MalformedInput(errors.to_string()),
        }
    }
}

/// Flatten nested validation errors to (leaf field, message) pairs
fn collect_field_errors(errors: &validator::ValidationErrors, out: &mut Vec<(String, String)>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is out of range".to_string());
                out.push((field.to_string(), message));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_field_errors(nested, out);
                }
            }
        }
    }
}
