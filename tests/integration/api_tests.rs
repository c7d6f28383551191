//! API integration tests
//!
//! These tests expect a running server seeded with an `admin`/`admin`
//! account, plus reachable Postgres and Redis instances.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

/// Helper to get an authenticated admin token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to create a reader account and return a token for it
async fn get_reader_token(client: &Client) -> String {
    let admin_token = get_admin_token(client).await;
    let login = format!("reader-{}", unique_suffix());

    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "login": login,
            "password": "readerpass",
            "account_type": "reader"
        }))
        .send()
        .await
        .expect("Failed to create reader");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": login,
            "password": "readerpass"
        }))
        .send()
        .await
        .expect("Failed to login as reader");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to create a book and one available copy; returns (book_id, copy_id)
async fn create_book_with_copy(client: &Client, token: &str, title: &str) -> (i64, String) {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "isbn": "9780132350884",
            "summary": "Test fixture"
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book");
    let book_id = body["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "imprint": "Test imprint",
            "status": "available"
        }))
        .send()
        .await
        .expect("Failed to create copy");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse copy");
    let copy_id = body["id"].as_str().expect("No copy ID").to_string();

    (book_id, copy_id)
}

async fn delete_book(client: &Client, token: &str, book_id: i64) {
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_book_list_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert_eq!(body["per_page"], 10);
}

#[tokio::test]
#[ignore]
async fn test_all_loans_requires_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_all_loans_and_renew_forbidden_for_readers() {
    let client = Client::new();
    let reader_token = get_reader_token(&client).await;

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Renewal is gated the same way, even for a nonexistent copy:
    // the permission check fires before the lookup
    let copy_id = uuid_like();
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .json(&json!({ "due_back": "2030-01-01" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

fn uuid_like() -> &'static str {
    "00000000-0000-0000-0000-000000000000"
}

#[tokio::test]
#[ignore]
async fn test_renewal_window_boundaries() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (book_id, copy_id) = create_book_with_copy(&client, &token, "Renewal fixture").await;

    // Put the copy on loan first
    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch current user")
        .json()
        .await
        .expect("Failed to parse current user");
    let user_id = me["id"].as_i64().expect("No user id");

    let response = client
        .post(format!("{}/copies/{}/borrow", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to borrow copy");
    assert!(response.status().is_success());

    let today = today_utc();

    // Yesterday is rejected
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": offset_date(&today, -1) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Exactly four weeks out is accepted
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": offset_date(&today, 28) }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Four weeks and a day is rejected
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": offset_date(&today, 29) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    delete_book(&client, &token, book_id).await;
}

#[tokio::test]
#[ignore]
async fn test_renew_unknown_copy_is_not_found() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, uuid_like()))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": "2030-01-01" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_my_loans_only_lists_on_loan_copies_in_due_order() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;

    let login = format!("borrower-{}", unique_suffix());
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "login": login,
            "password": "borrowerpass",
            "account_type": "reader"
        }))
        .send()
        .await
        .expect("Failed to create borrower");
    let borrower: Value = response.json().await.expect("Failed to parse borrower");
    let borrower_id = borrower["id"].as_i64().expect("No borrower id");

    // One copy stays available, two go on loan with distinct due dates
    let (book_a, copy_idle) = create_book_with_copy(&client, &admin_token, "Shelved fixture").await;
    let (book_b, copy_late) = create_book_with_copy(&client, &admin_token, "Due later fixture").await;
    let (book_c, copy_soon) = create_book_with_copy(&client, &admin_token, "Due soon fixture").await;

    let today = today_utc();
    for (copy_id, days) in [(&copy_late, 21), (&copy_soon, 7)] {
        let response = client
            .post(format!("{}/copies/{}/borrow", BASE_URL, copy_id))
            .header("Authorization", format!("Bearer {}", admin_token))
            .json(&json!({
                "user_id": borrower_id,
                "due_back": offset_date(&today, days)
            }))
            .send()
            .await
            .expect("Failed to borrow copy");
        assert!(response.status().is_success());
    }

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "login": login, "password": "borrowerpass" }))
        .send()
        .await
        .expect("Failed to login as borrower");
    let body: Value = response.json().await.expect("Failed to parse login");
    let borrower_token = body["token"].as_str().expect("No token").to_string();

    let response = client
        .get(format!("{}/loans/my", BASE_URL))
        .header("Authorization", format!("Bearer {}", borrower_token))
        .send()
        .await
        .expect("Failed to list loans");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse loans");
    let items = body["items"].as_array().expect("No items");
    let ids: Vec<&str> = items
        .iter()
        .map(|l| l["copy_id"].as_str().expect("No copy_id"))
        .collect();

    // The available copy never shows up; the earliest due date comes first
    assert!(!ids.contains(&copy_idle.as_str()));
    let soon_pos = ids.iter().position(|id| *id == copy_soon).expect("due-soon loan missing");
    let late_pos = ids.iter().position(|id| *id == copy_late).expect("due-later loan missing");
    assert!(soon_pos < late_pos);

    for book_id in [book_a, book_b, book_c] {
        delete_book(&client, &admin_token, book_id).await;
    }
}

#[tokio::test]
#[ignore]
async fn test_home_visit_counter_per_session() {
    // A cookie-keeping client is one browsing session
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let first: Value = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(first["num_visits"], 0);

    let second: Value = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(second["num_visits"], 1);

    // A fresh session starts over
    let other = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");
    let fresh: Value = other
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(fresh["num_visits"], 0);
}

#[tokio::test]
#[ignore]
async fn test_home_counts_title_matches_case_insensitively() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let before: Value = client
        .get(format!("{}/?title_contains=guide", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let before_count = before["num_books_title_matching"].as_i64().expect("No count");

    let mut created = Vec::new();
    for title in ["A Guide to Axum", "guidebook of fixtures", "GUIDE"] {
        let (book_id, _) = create_book_with_copy(&client, &token, title).await;
        created.push(book_id);
    }
    // "guid" alone must not count toward "guide" containment
    let (odd_one, _) = create_book_with_copy(&client, &token, "guid only").await;
    created.push(odd_one);

    let after: Value = client
        .get(format!("{}/?title_contains=guide", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let after_count = after["num_books_title_matching"].as_i64().expect("No count");

    assert_eq!(after_count, before_count + 3);

    for book_id in created {
        delete_book(&client, &token, book_id).await;
    }
}

fn today_utc() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

fn offset_date(today: &chrono::NaiveDate, days: i64) -> String {
    (*today + Duration::days(days)).format("%Y-%m-%d").to_string()
}
