//! Request bodies for integration tests.

use serde_json::json;

/// Device register request body.
pub fn device_register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Answer submission body.
pub fn submit_answer_request(word_id: i64, language_id: i64, correct: bool) -> serde_json::Value {
    json!({
        "word_id": word_id,
        "language_id": language_id,
        "correct": correct
    })
}

/// Create progress body with the store defaults.
pub fn create_progress_request(word_id: i64, language_id: i64) -> serde_json::Value {
    json!({
        "word_id": word_id,
        "target_language_id": language_id
    })
}

/// Review queue body.
pub fn review_queue_request(language_id: i64, word_ids: &[i64]) -> serde_json::Value {
    json!({
        "language_id": language_id,
        "word_ids": word_ids
    })
}
