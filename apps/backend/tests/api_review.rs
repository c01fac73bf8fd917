//! Review API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use serde_json::json;

use common::fixtures;
use common::TestContext;

/// First correct answer creates a learning record due tomorrow.
#[tokio::test]
#[ignore = "requires database"]
async fn test_first_correct_answer_creates_progress() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let (device_id, token) = ctx.create_test_device(None).await;

    let response = server
        .post("/api/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::submit_answer_request(101, 1, true))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["created"], true);
    assert_eq!(body["progress"]["status"], "learning");
    assert_eq!(body["progress"]["interval"], 1);
    assert_eq!(body["progress"]["review_count"], 1);
    assert_eq!(body["progress"]["correct_count"], 1);

    ctx.cleanup_device(device_id).await;
}

/// Repeated answers walk the step table and update the same record.
#[tokio::test]
#[ignore = "requires database"]
async fn test_answers_update_same_record() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let (device_id, token) = ctx.create_test_device(None).await;

    let mut intervals = Vec::new();
    let mut ids = Vec::new();
    for _ in 0..4 {
        let body: serde_json::Value = server
            .post("/api/review")
            .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
            .json(&fixtures::submit_answer_request(102, 1, true))
            .await
            .json();
        intervals.push(body["progress"]["interval"].as_i64().unwrap());
        ids.push(body["progress"]["id"].as_i64().unwrap());
    }

    assert_eq!(intervals, vec![1, 3, 7, 14]);
    assert!(ids.iter().all(|id| *id == ids[0]));

    let body: serde_json::Value = server
        .post("/api/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::submit_answer_request(102, 1, false))
        .await
        .json();
    assert_eq!(body["progress"]["interval"], 0);
    assert_eq!(body["progress"]["status"], "learning");
    assert_eq!(body["progress"]["review_count"], 5);
    assert_eq!(body["progress"]["correct_count"], 4);

    ctx.cleanup_device(device_id).await;
}

/// An out-of-range UTC offset is rejected and the record is left alone.
#[tokio::test]
#[ignore = "requires database"]
async fn test_out_of_range_offset_is_rejected() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let (device_id, token) = ctx.create_test_device(None).await;

    server
        .post("/api/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::submit_answer_request(103, 1, true))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "word_id": 103, "language_id": 1, "correct": true, "utc_offset_minutes": 5000 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = server
        .get("/api/progress/words?word_id=103")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .json();
    assert_eq!(body["results"][0]["review_count"], 1);

    ctx.cleanup_device(device_id).await;
}

/// Queue returns due and untracked words, falling back to the batch.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_queue() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let (device_id, token) = ctx.create_test_device(None).await;

    // Word 201 is scheduled for tomorrow, 202 is untracked.
    server
        .post("/api/review")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::submit_answer_request(201, 1, true))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .post("/api/review/queue")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::review_queue_request(1, &[201, 202]))
        .await
        .json();
    assert_eq!(body["word_ids"], json!([202]));
    assert_eq!(body["due_count"], 1);

    let body: serde_json::Value = server
        .post("/api/review/queue")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::review_queue_request(1, &[201]))
        .await
        .json();
    assert_eq!(body["word_ids"], json!([201]));
    assert_eq!(body["due_count"], 0);

    ctx.cleanup_device(device_id).await;
}

/// Review endpoints require authentication.
#[tokio::test]
#[ignore = "requires database"]
async fn test_review_requires_auth() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server
        .post("/api/review")
        .json(&fixtures::submit_answer_request(1, 1, true))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
