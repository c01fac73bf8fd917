//! Word progress endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedDevice;
use crate::services::progress::{update_progress, validate_state};
use crate::services::review::local_now;
use crate::AppState;

/// GET /api/progress/words
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Query(query): Query<ProgressListQuery>,
) -> Result<Json<ProgressListResponse>> {
    let rows = state
        .db
        .list_word_progress(auth.device_id, query.language_id, query.word_id)
        .await?;

    let results: Vec<WordProgress> = rows.iter().map(|r| r.to_api_progress()).collect();

    Ok(Json(ProgressListResponse {
        count: results.len(),
        results,
    }))
}

/// POST /api/progress/words
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Json(request): Json<CreateWordProgressRequest>,
) -> Result<(StatusCode, Json<WordProgress>)> {
    let today = local_now(Utc::now(), request.utc_offset_minutes)?.date_naive();
    let new = request.into_new_progress(today);
    validate_state(&new.state, state.scheduler.max_interval_days)?;

    let row = state.db.create_word_progress(auth.device_id, &new).await?;

    Ok((StatusCode::CREATED, Json(row.to_api_progress())))
}

/// GET /api/progress/words/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Path(progress_id): Path<i64>,
) -> Result<Json<WordProgress>> {
    let row = state
        .db
        .get_word_progress(auth.device_id, progress_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Progress {} not found", progress_id)))?;

    Ok(Json(row.to_api_progress()))
}

/// PATCH /api/progress/words/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Path(progress_id): Path<i64>,
    Json(request): Json<UpdateWordProgressRequest>,
) -> Result<Json<WordProgress>> {
    let row = update_progress(
        &state.db,
        auth.device_id,
        progress_id,
        &request,
        state.scheduler.max_interval_days,
    )
    .await?;

    Ok(Json(row.to_api_progress()))
}

/// DELETE /api/progress/words/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Path(progress_id): Path<i64>,
) -> Result<StatusCode> {
    let deleted = state
        .db
        .delete_word_progress(auth.device_id, progress_id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound(format!("Progress {} not found", progress_id)));
    }

    tracing::info!("Deleted progress {} for device {}", progress_id, auth.device_id);

    Ok(StatusCode::NO_CONTENT)
}
