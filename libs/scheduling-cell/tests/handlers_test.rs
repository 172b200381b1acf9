use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use scheduling_cell::router::scheduling_routes;
use scheduling_cell::services::ScheduleStore;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn app() -> (Router, String) {
    let test_config = TestConfig::default();
    let token = JwtTestUtils::create_test_token(&TestUser::receptionist("desk@example.com"), &test_config.jwt_secret, Some(1));
    let store = Arc::new(ScheduleStore::with_fixtures(anchor()));
    (scheduling_routes(test_config.to_arc(), store), token)
}

async fn send(app: Router, token: &str, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token));

    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[tokio::test]
async fn test_requires_authentication() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/time-grid").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_time_grid_defaults_to_config_hours() {
    let (app, token) = app();
    let (status, body) = send(app, &token, "GET", "/time-grid", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let grid = body["data"].as_array().unwrap();
    assert_eq!(grid.len(), 20);
    assert_eq!(grid[0], "08:00");
    assert_eq!(grid[19], "17:30");
}

#[tokio::test]
async fn test_time_grid_rejects_hours_past_midnight() {
    let (app, token) = app();
    let (status, body) = send(app, &token, "GET", "/time-grid?start_hour=8&end_hour=30", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_day_slots_for_fixture_doctor() {
    let (app, token) = app();
    let (status, body) = send(app, &token, "GET", "/doctors/doc-garcia/slots?date=2024-03-04", None).await;

    assert_eq!(status, StatusCode::OK);
    let slots = body["data"]["slots"].as_array().unwrap();
    let status_at = |label: &str| {
        slots
            .iter()
            .find(|s| s["time"] == label)
            .map(|s| s["status"].as_str().unwrap().to_string())
            .unwrap()
    };

    assert_eq!(status_at("09:00"), "booked");
    assert_eq!(status_at("09:30"), "booked");
    assert_eq!(status_at("10:00"), "available");
    assert_eq!(status_at("10:30"), "break");
    // apt-005 is cancelled
    assert_eq!(status_at("11:00"), "available");
    assert_eq!(status_at("13:30"), "break");
    assert_eq!(status_at("15:00"), "unavailable");
    assert_eq!(status_at("17:00"), "unavailable");
    assert_eq!(body["data"]["booked_count"], 2);
    assert_eq!(body["data"]["remaining_capacity"], 10);
}

#[tokio::test]
async fn test_day_slots_unknown_doctor() {
    let (app, token) = app();
    let (status, body) = send(app, &token, "GET", "/doctors/doc-nobody/slots?date=2024-03-04", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_appointments_with_filters() {
    let (app, token) = app();
    let (status, body) = send(
        app.clone(),
        &token,
        "GET",
        "/appointments?date=2024-03-04&doctor_id=doc-garcia",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["appointments"][0]["id"], "apt-001");
    assert_eq!(body["data"]["summary"]["cancelled"], 1);

    let (_, body) = send(app.clone(), &token, "GET", "/appointments?search=rossi", None).await;
    assert_eq!(body["data"]["total"], 1);

    let (_, body) = send(app, &token, "GET", "/appointments?status=no_show", None).await;
    assert_eq!(body["data"]["appointments"][0]["id"], "apt-006");
}

#[tokio::test]
async fn test_update_availability_changes_slots() {
    let (app, token) = app();

    let (status, body) = send(
        app.clone(),
        &token,
        "PUT",
        "/doctors/doc-garcia/availability",
        Some(json!({ "unavailable": [] , "work_end": "17:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["work_end"], "17:00");

    let (_, body) = send(app, &token, "GET", "/doctors/doc-garcia/slots?date=2024-03-04", None).await;
    let slot_1500 = body["data"]["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["time"] == "15:00")
        .unwrap()
        .clone();
    assert_eq!(slot_1500["status"], "available");
}

#[tokio::test]
async fn test_update_availability_validation_error() {
    let (app, token) = app();
    let (status, body) = send(
        app.clone(),
        &token,
        "PUT",
        "/doctors/doc-garcia/availability",
        Some(json!({ "work_start": "18:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = send(app, &token, "GET", "/doctors/doc-garcia/availability", None).await;
    assert_eq!(body["data"]["work_start"], "08:00");
}

#[tokio::test]
async fn test_reschedule_reports_outcome_without_mutation() {
    let (app, token) = app();

    let (status, body) = send(
        app.clone(),
        &token,
        "POST",
        "/appointments/apt-001/reschedule",
        Some(json!({ "date": "2024-03-04", "start_time": "13:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "rejected");
    assert_eq!(body["data"]["status"], "break");

    let (_, body) = send(
        app.clone(),
        &token,
        "POST",
        "/appointments/apt-001/reschedule",
        Some(json!({ "date": "2024-03-04", "start_time": "10:00" })),
    )
    .await;
    assert_eq!(body["data"]["outcome"], "accepted");

    let (_, body) = send(app, &token, "GET", "/appointments?search=fernandez", None).await;
    assert_eq!(body["data"]["appointments"][0]["start_time"], "09:00");
}

#[tokio::test]
async fn test_waiting_list_and_matches() {
    let (app, token) = app();

    let (status, body) = send(app.clone(), &token, "GET", "/waiting-list?today=2024-03-04", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["id"], "wl-001");
    assert_eq!(entries[0]["days_waiting"], 6);
    assert_eq!(entries[2]["priority"], "low");

    // wl-001 wants doc-garcia at 09:00/10:00 today or tomorrow; 09:00 today is booked
    let (_, body) = send(app, &token, "GET", "/waiting-list/wl-001/matches", None).await;
    let matches: Vec<(String, String)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| (m["date"].as_str().unwrap().to_string(), m["time"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        matches,
        vec![
            ("2024-03-04".to_string(), "10:00".to_string()),
            ("2024-03-05".to_string(), "09:00".to_string()),
            ("2024-03-05".to_string(), "10:00".to_string()),
        ]
    );
}
