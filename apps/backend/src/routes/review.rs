//! Review endpoints

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedDevice;
use crate::services::{progress, review};
use crate::AppState;

/// POST /api/review
pub async fn submit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<ReviewOutcome>> {
    let outcome = review::submit_answer(
        &state.db,
        &state.scheduler,
        auth.device_id,
        &payload,
        Utc::now(),
    )
    .await?;

    Ok(Json(outcome))
}

/// POST /api/review/queue
pub async fn queue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Json(payload): Json<ReviewQueueRequest>,
) -> Result<Json<ReviewQueueResponse>> {
    if payload.limit == Some(0) {
        return Err(ApiError::BadRequest("limit must be positive".to_string()));
    }

    let tracked = state
        .db
        .list_word_progress(auth.device_id, Some(payload.language_id), None)
        .await?;

    Ok(Json(progress::build_review_queue(
        payload.word_ids,
        &tracked,
        Utc::now(),
        payload.limit,
    )))
}
