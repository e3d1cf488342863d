//! Calculator API routes

use crate::error::ApiError;
use crate::services::calculators::{CalculationResponse, CalculatorService};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path},
    routing::get,
    Json, Router,
};
use health_calculators_shared::calculator::{CalculatorInfo, CategoryListing, EvalContext};
use serde::Serialize;

/// Create calculator routes
pub fn calculator_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_calculators))
        .route("/:slug", get(get_calculator).post(calculate))
}

/// Catalog response
#[derive(Serialize)]
pub struct CatalogResponse {
    pub total: usize,
    pub categories: Vec<CategoryListing>,
}

/// GET /api/v1/calculators - List calculators grouped by category
async fn list_calculators() -> Json<CatalogResponse> {
    let categories = CalculatorService::catalog();
    let total = categories.iter().map(|c| c.calculators.len()).sum();
    Json(CatalogResponse { total, categories })
}

/// GET /api/v1/calculators/:slug - Calculator metadata
async fn get_calculator(Path(slug): Path<String>) -> Result<Json<CalculatorInfo>, ApiError> {
    Ok(Json(CalculatorService::describe(&slug)?))
}

/// POST /api/v1/calculators/:slug - Run a calculator
///
/// Evaluated against today's UTC date.
async fn calculate(
    Path(slug): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<CalculationResponse>, ApiError> {
    // Unknown slugs are a 404 even when the body is also bad
    CalculatorService::resolve(&slug)?;
    let Json(input) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let ctx = EvalContext::new(chrono::Utc::now().date_naive());
    Ok(Json(CalculatorService::calculate(&slug, input, &ctx)?))
}
