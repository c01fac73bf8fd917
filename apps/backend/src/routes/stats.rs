//! Progress statistics endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedDevice;
use crate::services::progress::build_words_stats;
use crate::AppState;

/// GET /api/progress/words-stats
pub async fn words(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
    Query(query): Query<WordsStatsQuery>,
) -> Result<Json<WordsStatsResponse>> {
    let rows = state
        .db
        .get_status_counts(auth.device_id, query.language_id)
        .await?;

    Ok(Json(build_words_stats(&rows)))
}
