//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting calculator failures to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use health_calculators_shared::{validation::user_message, CalculatorError};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing input: {message}")]
    MissingInput { field: String, message: String },

    #[error("Validation error: {message}")]
    Validation { field: Option<String>, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<CalculatorError> for ApiError {
    fn from(err: CalculatorError) -> Self {
        let message = user_message(&err);
        match err {
            CalculatorError::MissingInput(field) => ApiError::MissingInput { field, message },
            CalculatorError::Invalid { field, .. } => ApiError::Validation {
                field: Some(field),
                message,
            },
            CalculatorError::UnknownCalculator(slug) => {
                ApiError::NotFound(format!("Calculator '{}' does not exist", slug))
            }
            CalculatorError::MalformedInput(detail) => ApiError::BadRequest(detail),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Machine-readable code in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingInput { .. } => "MISSING_INPUT",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        debug!(status = status.as_u16(), code, "Request rejected");

        let (message, field) = match self {
            ApiError::MissingInput { field, message } => (message, Some(field)),
            ApiError::Validation { field, message } => (message, field),
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => (msg, None),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
