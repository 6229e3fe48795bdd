//! Router tests that run without a database: authentication, rights and
//! request checks all reject before any query is made.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use catalog_server::{
    api,
    config::AppConfig,
    lending::FixedClock,
    models::user::{Rights, UserClaims, UserRights},
    repository::Repository,
    services::Services,
    AppState,
};

const SECRET: &str = "router-test-secret";
const COPY: &str = "/api/v1/instances/6f1c1f9e-3f0a-4a52-9a57-2d4c4e0b2f11";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn app() -> Router {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = SECRET.to_string();

    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .unwrap();
    let services = Services::new(Repository::new(pool), config.lending.renewal_policy());

    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        clock: Arc::new(FixedClock(today())),
    })
}

fn token(is_staff: bool, rights: UserRights) -> String {
    let now = Utc::now();
    UserClaims {
        sub: "tester".to_string(),
        user_id: 42,
        is_staff,
        rights,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
    .create_token(SECRET)
    .unwrap()
}

fn reader() -> String {
    token(false, UserRights::default())
}

fn librarian() -> String {
    token(
        true,
        UserRights {
            catalog_rights: Rights::Write,
            lending_rights: Rights::Write,
            events_rights: Rights::Write,
        },
    )
}

async fn send(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/instances/{id}/renew"].is_object());
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let (status, body) = send(Method::GET, "/api/v1/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let forged = UserClaims::from_token(&reader(), SECRET)
        .unwrap()
        .create_token("another-secret")
        .unwrap();
    let (status, _) = send(Method::GET, "/api/v1/books", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn renewal_in_the_past_is_rejected() {
    let uri = format!("{}/renew", COPY);
    let (status, body) = send(
        Method::POST,
        &uri,
        Some(&librarian()),
        Some(json!({ "renewal_date": "2024-01-09" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
    assert_eq!(body["message"], "date in the past");
}

#[tokio::test]
async fn renewal_beyond_four_weeks_is_rejected() {
    let uri = format!("{}/renew", COPY);
    let (status, body) = send(
        Method::POST,
        &uri,
        Some(&librarian()),
        Some(json!({ "renewal_date": "2024-02-08" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);
    assert_eq!(body["message"], "date too far in the future");
}

#[tokio::test]
async fn renewal_needs_lending_rights() {
    let uri = format!("{}/renew", COPY);
    let (status, body) = send(
        Method::POST,
        &uri,
        Some(&reader()),
        Some(json!({ "renewal_date": "2024-01-20" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn renewal_window_follows_the_clock() {
    let uri = format!("{}/renew", COPY);
    let (status, body) = send(Method::GET, &uri, Some(&librarian()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["earliest"], "2024-01-10");
    assert_eq!(body["latest"], "2024-02-07");
    assert_eq!(body["suggested"], "2024-01-31");
}

#[tokio::test]
async fn lending_past_due_date_is_rejected() {
    let uri = format!("{}/lend", COPY);
    let (status, body) = send(
        Method::POST,
        &uri,
        Some(&librarian()),
        Some(json!({ "borrower_id": 3, "due_back": "2023-12-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
}

#[tokio::test]
async fn status_change_with_past_due_date_is_rejected() {
    let uri = format!("{}/status", COPY);
    let (status, body) = send(
        Method::PUT,
        &uri,
        Some(&librarian()),
        Some(json!({ "status": "on_loan", "due_back": "2023-12-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
}

#[tokio::test]
async fn status_change_beyond_four_weeks_is_rejected() {
    let uri = format!("{}/status", COPY);
    let (status, body) = send(
        Method::PUT,
        &uri,
        Some(&librarian()),
        Some(json!({ "status": "on_loan", "due_back": "2024-02-08" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);
}

#[tokio::test]
async fn borrower_without_loan_is_rejected() {
    let uri = format!("{}/status", COPY);
    let (status, body) = send(
        Method::PUT,
        &uri,
        Some(&librarian()),
        Some(json!({ "status": "available", "borrower_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn all_loans_are_staff_only() {
    let (status, _) = send(Method::GET, "/api/v1/loans", Some(&reader()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn other_users_loans_need_rights() {
    let (status, _) = send(Method::GET, "/api/v1/users/43/loans", Some(&reader()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn book_with_short_isbn_is_rejected() {
    let (status, body) = send(
        Method::POST,
        "/api/v1/books",
        Some(&librarian()),
        Some(json!({
            "title": "Kobzar",
            "isbn": "12345",
            "year_of_creation": 1840
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn catalog_writes_need_write_rights() {
    let (status, _) = send(
        Method::POST,
        "/api/v1/genres",
        Some(&reader()),
        Some(json!({ "name": "Poetry" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn event_with_malformed_time_is_rejected() {
    let (status, body) = send(
        Method::POST,
        "/api/v1/events",
        Some(&librarian()),
        Some(json!({
            "title": "Reading club",
            "start_time": "10/01/2024 18:00",
            "end_time": "2024-01-10T20:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("start_time"));
}

#[tokio::test]
async fn event_ending_before_start_is_rejected() {
    let (status, body) = send(
        Method::POST,
        "/api/v1/events",
        Some(&librarian()),
        Some(json!({
            "title": "Reading club",
            "start_time": "2024-01-10T20:00",
            "end_time": "2024-01-10T18:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn calendar_rejects_invalid_month() {
    let (status, _) = send(
        Method::GET,
        "/api/v1/events/calendar?year=2024&month=13",
        Some(&reader()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
