//! API integration tests against a running server
//!
//! Start the server with a migrated database containing at least one user
//! (id from `CATALOG_TEST_BORROWER_ID`, default 1), then run:
//! `cargo test -- --ignored`

use chrono::{Duration, Local, Utc};
use reqwest::Client;
use serde_json::{json, Value};

use catalog_server::models::user::{Rights, UserClaims, UserRights};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Sign a librarian token with the server's secret
fn librarian_token() -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now();
    UserClaims {
        sub: "librarian".to_string(),
        user_id: 1,
        is_staff: true,
        rights: UserRights {
            catalog_rights: Rights::Write,
            lending_rights: Rights::Write,
            events_rights: Rights::Write,
        },
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

fn borrower_id() -> i64 {
    std::env::var("CATALOG_TEST_BORROWER_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
}

fn unique_isbn() -> String {
    format!("{:013}", Utc::now().timestamp_micros() % 10_000_000_000_000)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle_with_loan() {
    let client = Client::new();
    let token = librarian_token();

    // Genre and author
    let genre: Value = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("Genre {}", Utc::now().timestamp_micros()) }))
        .send()
        .await
        .expect("Failed to create genre")
        .json()
        .await
        .expect("Failed to parse genre");

    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "first_name": "Taras", "last_name": "Shevchenko", "date_of_birth": "1814-03-09" }))
        .send()
        .await
        .expect("Failed to create author")
        .json()
        .await
        .expect("Failed to parse author");

    // Book
    let isbn = unique_isbn();
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Kobzar",
            "author_id": author["id"],
            "isbn": isbn,
            "genre_ids": [genre["id"]],
            "year_of_creation": 1840,
            "photo": "kobzar.jpg"
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse book");
    let book_id = book["id"].as_i64().expect("No book id");
    assert!(book["photo"].as_str().unwrap_or_default().starts_with("photos/"));

    // Same ISBN again
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "Copy", "isbn": isbn, "year_of_creation": 1840 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Copy, lend, renew, return
    let copy: Value = client
        .post(format!("{}/books/{}/instances", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({ "imprint": "Kyiv, 1840", "status": "available" }))
        .send()
        .await
        .expect("Failed to create copy")
        .json()
        .await
        .expect("Failed to parse copy");
    let copy_id = copy["id"].as_str().expect("No copy id").to_string();

    let response = client
        .post(format!("{}/instances/{}/lend", BASE_URL, copy_id))
        .bearer_auth(&token)
        .json(&json!({ "borrower_id": borrower_id() }))
        .send()
        .await
        .expect("Failed to lend");
    assert_eq!(response.status(), 200);
    let lent: Value = response.json().await.expect("Failed to parse copy");
    assert_eq!(lent["status"], "on_loan");

    let renewal = (Local::now().date_naive() + Duration::weeks(2)).to_string();
    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, copy_id))
        .bearer_auth(&token)
        .json(&json!({ "renewal_date": renewal }))
        .send()
        .await
        .expect("Failed to renew");
    assert_eq!(response.status(), 200);
    let renewed: Value = response.json().await.expect("Failed to parse copy");
    assert_eq!(renewed["due_back"], renewal);
    assert_eq!(renewed["is_overdue"], false);

    // Book cannot go while it has copies
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .post(format!("{}/instances/{}/return", BASE_URL, copy_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to return");
    let returned: Value = response.json().await.expect("Failed to parse copy");
    assert_eq!(returned["status"], "available");
    assert!(returned["due_back"].is_null());

    // Cleanup
    for path in [
        format!("/instances/{}", copy_id),
        format!("/books/{}", book_id),
        format!("/authors/{}", author["id"]),
        format!("/genres/{}", genre["id"]),
    ] {
        let response = client
            .delete(format!("{}{}", BASE_URL, path))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to delete");
        assert_eq!(response.status(), 204, "DELETE {}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_event_calendar() {
    let client = Client::new();
    let token = librarian_token();

    let response = client
        .post(format!("{}/events", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Poetry evening",
            "start_time": "2031-03-14T18:30",
            "end_time": "2031-03-14T20:00"
        }))
        .send()
        .await
        .expect("Failed to create event");
    assert_eq!(response.status(), 201);
    let event: Value = response.json().await.expect("Failed to parse event");
    assert_eq!(event["start_time"], "2031-03-14T18:30");

    let calendar: Value = client
        .get(format!("{}/events/calendar?year=2031&month=3", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get calendar")
        .json()
        .await
        .expect("Failed to parse calendar");
    let days = calendar["days"].as_array().expect("No days");
    assert!(days.iter().any(|d| d["day"] == 14));

    let response = client
        .delete(format!("{}/events/{}", BASE_URL, event["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete event");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_anons() {
    let client = Client::new();
    let token = librarian_token();

    let response = client
        .post(format!("{}/anons", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "New arrivals", "content": "Spring catalog is out" }))
        .send()
        .await
        .expect("Failed to create announcement");
    assert_eq!(response.status(), 201);
    let anons: Value = response.json().await.expect("Failed to parse announcement");

    let response = client
        .delete(format!("{}/anons/{}", BASE_URL, anons["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete announcement");
    assert_eq!(response.status(), 204);
}
