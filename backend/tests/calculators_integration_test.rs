//! Integration tests for the calculator endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_list_calculators() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api/v1/calculators").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["total"], 19);
    assert_eq!(json["categories"].as_array().unwrap().len(), 6);
    assert_eq!(json["categories"][0]["title"], "Body Composition");
}

#[tokio::test]
async fn test_get_calculator_metadata() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api/v1/calculators/ovulation").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["slug"], "ovulation");
    assert_eq!(json["category"], "womens_health");
}

#[tokio::test]
async fn test_unknown_calculator() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api/v1/calculators/horoscope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("NOT_FOUND"));

    let (status, _) = app.post_json("/api/v1/calculators/horoscope", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calculate_bmi() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json("/api/v1/calculators/bmi", json!({ "weight": 70, "height": 175 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["calculator"]["slug"], "bmi");
    assert!(json["as_of"].is_string());
    assert_eq!(json["result"]["bmi"], 22.9);
    assert_eq!(json["result"]["category_label"], "Normal weight");
}

#[tokio::test]
async fn test_calculate_bmr() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            "/api/v1/calculators/bmr",
            json!({ "age": 30, "sex": "male", "weight": 80, "height": 180 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["bmr"], 1780.0);
}

#[tokio::test]
async fn test_calculate_heart_rate_zones() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            "/api/v1/calculators/heart-rate",
            json!({ "age": 40, "resting_heart_rate": 60 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["max_heart_rate"], 180);
    assert_eq!(json["result"]["zones"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_calculate_pregnancy_due_date() {
    let app = common::TestApp::new();

    // Any recent LMP works against today's date; check the 280-day rule
    let lmp = chrono::Utc::now().date_naive() - chrono::Duration::days(30);
    let due = lmp + chrono::Duration::days(280);

    let (status, json) = app
        .post_json(
            "/api/v1/calculators/pregnancy",
            json!({ "last_period": lmp.to_string() }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["due_date"], due.to_string());
    assert_eq!(json["result"]["trimester"], 1);
}

#[tokio::test]
async fn test_missing_input_envelope() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json("/api/v1/calculators/bmi", json!({ "weight": 70 }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "MISSING_INPUT");
    assert_eq!(json["error"]["field"], "height");
    assert_eq!(json["error"]["message"], "Height is required");
}

#[tokio::test]
async fn test_out_of_range_envelope() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            "/api/v1/calculators/ovulation",
            json!({ "last_period": "2024-01-01", "cycle_length": 60 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "cycle_length");
}

#[tokio::test]
async fn test_malformed_body() {
    let app = common::TestApp::new();

    let (status, body) = app.post("/api/v1/calculators/bmi", "{ not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("BAD_REQUEST"));
}

#[tokio::test]
async fn test_wrong_field_type() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json("/api/v1/calculators/bmi", json!({ "weight": "heavy", "height": 175 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_same_request_same_result() {
    let app = common::TestApp::new();
    let input = json!({
        "age": 55,
        "sex": "male",
        "weight": 95,
        "height": 178,
        "waist": 104,
        "family_history": true
    });

    let (_, first) = app.post_json("/api/v1/calculators/diabetes-risk", input.clone()).await;
    let (_, second) = app.post_json("/api/v1/calculators/diabetes-risk", input).await;

    assert_eq!(first["result"], second["result"]);
    // 2 age + 1 sex + 1 BMI + 2 waist + 1 family
    assert_eq!(first["result"]["score"], 7);
    assert_eq!(first["result"]["risk_level"], "High Risk");
}
