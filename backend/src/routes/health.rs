//! Health check endpoints
//!
//! Provides Kubernetes-compatible health check endpoints:
//! - /health - Basic health check
//! - /health/ready - Readiness probe (catalog plus a reference calculation)
//! - /health/live - Liveness probe (always returns OK if server is running)

use axum::{http::StatusCode, Json};
use chrono::Utc;
use health_calculators_shared::calculator::{self, CalculatorKind, CategoryListing, EvalContext};
use serde::Serialize;
use serde_json::json;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub calculators: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Catalog is listed and a reference BMI evaluates
fn check_calculators(listing: &[CategoryListing]) -> (bool, String) {
    let available: usize = listing.iter().map(|group| group.calculators.len()).sum();
    if available == 0 {
        return (false, "No calculators registered".to_string());
    }

    let ctx = EvalContext::new(Utc::now().date_naive());
    match calculator::evaluate(CalculatorKind::Bmi, json!({ "weight": 70, "height": 175 }), &ctx) {
        Ok(_) => (true, format!("{} calculators available", available)),
        Err(err) => (false, format!("Reference calculation failed: {}", err)),
    }
}

/// Readiness probe - checks if the service is ready to accept traffic
/// Returns 503 if the catalog is empty or a reference calculation fails
pub async fn readiness_check() -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (is_healthy, message) = check_calculators(&calculator::catalog());

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks {
            calculators: CheckStatus {
                status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
                message: Some(message),
            },
        }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe - checks if the service is alive
/// Always returns OK if the server is running
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}
