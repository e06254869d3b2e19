use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState::new(engine, "eventzen-test"))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_budget(app: &Router) -> String {
    let (status, budget) = send(
        app,
        Method::POST,
        "/budgets",
        Some(json!({
            "eventId": "event-1",
            "name": "Gala",
            "totalBudget": 10000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    budget["id"].as_str().unwrap().to_string()
}

async fn current_expenses(app: &Router, budget_id: &str) -> String {
    let (status, budget) = send(app, Method::GET, &format!("/budgets/{budget_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    budget["currentExpenses"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["service"], "eventzen-test");
}

#[tokio::test]
async fn expense_requests_move_the_budget_total() {
    let app = app().await;
    let budget_id = create_budget(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({
            "budgetId": budget_id,
            "category": "Venue",
            "amount": "500.00",
            "date": "2025-06-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(current_expenses(&app, &budget_id).await, "500.00");

    let (status, expense) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({
            "budgetId": budget_id,
            "category": "Catering",
            "amount": 100,
            "date": "2025-06-01",
            "paymentStatus": "whatever"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["amount"], "100.00");
    assert_eq!(expense["paymentStatus"], "PENDING");
    assert_eq!(current_expenses(&app, &budget_id).await, "600.00");

    let expense_id = expense["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/expenses/{expense_id}"),
        Some(json!({
            "budgetId": budget_id,
            "category": "Catering",
            "amount": 150.0,
            "date": "2025-06-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current_expenses(&app, &budget_id).await, "650.00");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/expenses/{expense_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(current_expenses(&app, &budget_id).await, "500.00");

    let (status, expenses) = send(
        &app,
        Method::GET,
        &format!("/expenses/budget/{budget_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(expenses.as_array().unwrap().len(), 1);

    let (status, report) = send(
        &app,
        Method::POST,
        &format!("/budgets/{budget_id}/reconcile"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["drifted"], false);
    assert_eq!(report["expensesAfter"], "500.00");
}

#[tokio::test]
async fn missing_resource_renders_error_body_with_path() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/expenses/unknown-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["path"], "/expenses/unknown-id");
    assert!(body["message"].as_str().unwrap().contains("unknown-id"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn expense_for_missing_budget_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({
            "budgetId": "no-such-budget",
            "category": "Venue",
            "amount": "10",
            "date": "2025-06-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/expenses");

    let (_, expenses) = send(&app, Method::GET, "/expenses", None).await;
    assert!(expenses.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_status_in_path_is_bad_request() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/budgets/status/OPEN", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["path"], "/budgets/status/OPEN");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/budgets")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["path"], "/budgets");
}

#[tokio::test]
async fn three_decimal_amount_is_rejected() {
    let app = app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/budgets",
        Some(json!({
            "eventId": "event-1",
            "name": "Gala",
            "totalBudget": "10.005"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn events_are_paginated() {
    let app = app().await;
    for n in 0..3 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/events",
            Some(json!({ "title": format!("Show {n}"), "isPublic": true })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(&app, Method::GET, "/events?page=1&size=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["content"].as_array().unwrap().len(), 1);
    assert_eq!(page["totalElements"], 3);
    assert_eq!(page["totalPages"], 2);

    let (status, page) = send(&app, Method::GET, "/events/search?title=show&size=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalElements"], 3);
}

#[tokio::test]
async fn event_status_patch_uses_query_parameter() {
    let app = app().await;
    let (_, event) = send(
        &app,
        Method::POST,
        "/events",
        Some(json!({ "title": "Launch", "price": "12.50" })),
    )
    .await;
    assert_eq!(event["status"], "DRAFT");
    assert_eq!(event["price"], "12.50");
    let id = event["id"].as_str().unwrap();

    let (status, event) = send(
        &app,
        Method::PATCH,
        &format!("/events/{id}/status?status=PUBLISHED"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["status"], "PUBLISHED");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/events/{id}/status?status=LIVE"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_attendee_email_conflicts() {
    let app = app().await;
    let payload = json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.test"
    });
    let (status, _) = send(&app, Method::POST, "/api/attendees", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, Method::POST, "/api/attendees", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn registration_check_in_and_count() {
    let app = app().await;
    let (status, registration) = send(
        &app,
        Method::POST,
        "/api/registrations",
        Some(json!({ "attendeeId": "a1", "eventId": "event-9", "ticketPrice": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registration["ticketPrice"], "40.00");
    let id = registration["id"].as_str().unwrap();

    let (status, checked) = send(
        &app,
        Method::PATCH,
        &format!("/api/registrations/{id}/check-in"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checked["checkInStatus"], "CHECKED_IN");
    assert!(checked["checkInTime"].is_string());

    let (status, count) = send(
        &app,
        Method::GET,
        "/api/registrations/event/event-9/count",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["eventId"], "event-9");
    assert_eq!(count["count"], 1);

    let (_, count) = send(
        &app,
        Method::GET,
        "/api/registrations/event/event-9/count?paymentStatus=COMPLETED",
        None,
    )
    .await;
    assert_eq!(count["count"], 0);
}
