//! Server-side review flow.
//!
//! Read, schedule and write run in one transaction with the progress row
//! locked, so two sessions answering the same word cannot interleave.

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::PgConnection;
use uuid::Uuid;
use vocab_core::ReviewScheduler;

use crate::db::{progress, Database};
use crate::error::{ApiError, Result};
use crate::models::*;

/// Largest accepted UTC offset, in minutes.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Learner-local clock for an answer.
pub fn local_now(now: DateTime<Utc>, utc_offset_minutes: i32) -> Result<DateTime<FixedOffset>> {
    if utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(ApiError::BadRequest(format!(
            "utc_offset_minutes out of range: {utc_offset_minutes}"
        )));
    }
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
        ApiError::BadRequest(format!("invalid utc offset: {utc_offset_minutes}"))
    })?;
    Ok(now.with_timezone(&offset))
}

/// Record an answer and persist the new schedule.
pub async fn submit_answer(
    db: &Database,
    scheduler: &ReviewScheduler,
    device_id: Uuid,
    request: &SubmitAnswerRequest,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome> {
    let now = local_now(now, request.utc_offset_minutes)?;
    let mut tx = db.begin().await?;

    let existing = progress::find_by_word(
        &mut *tx,
        device_id,
        request.word_id,
        request.language_id,
        true,
    )
    .await?;

    let outcome = match existing {
        Some(row) => apply_to_existing(&mut *tx, scheduler, &row, request.correct, &now).await?,
        None => {
            let state = scheduler.apply_outcome(None, request.correct, &now)?;
            let new = NewWordProgress {
                word_id: request.word_id,
                target_language_id: request.language_id,
                state,
            };

            match progress::insert_if_absent(&mut *tx, device_id, &new).await? {
                Some(row) => ReviewOutcome {
                    progress: row.to_api_progress(),
                    created: true,
                },
                None => {
                    // Another session created the record first; schedule on top of it.
                    tracing::debug!(
                        "Progress for word {} created concurrently, retrying as update",
                        request.word_id
                    );
                    let row = progress::find_by_word(
                        &mut *tx,
                        device_id,
                        request.word_id,
                        request.language_id,
                        true,
                    )
                    .await?
                    .ok_or_else(|| {
                        ApiError::Internal("progress vanished after conflict".to_string())
                    })?;
                    apply_to_existing(&mut *tx, scheduler, &row, request.correct, &now).await?
                }
            }
        }
    };

    tx.commit().await?;

    tracing::info!(
        "Reviewed word {} (language {}): correct={} status={} interval={}",
        request.word_id,
        request.language_id,
        request.correct,
        outcome.progress.state.status,
        outcome.progress.state.interval
    );

    Ok(outcome)
}

async fn apply_to_existing(
    conn: &mut PgConnection,
    scheduler: &ReviewScheduler,
    row: &DbWordProgress,
    correct: bool,
    now: &DateTime<FixedOffset>,
) -> Result<ReviewOutcome> {
    let prior = row.to_core_state();
    let state = scheduler.apply_outcome(Some(&prior), correct, now)?;

    let updated = progress::write_state(conn, row.device_id, row.id, &state)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Progress {} not found", row.id)))?;

    Ok(ReviewOutcome {
        progress: updated.to_api_progress(),
        created: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_local_now_applies_offset() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 2, 30, 0).unwrap();
        let local = local_now(now, -300).unwrap();
        assert_eq!(local.hour(), 21);
        assert_eq!(local.date_naive().to_string(), "2024-05-31");
        assert_eq!(local, now);
    }

    #[test]
    fn test_local_now_rejects_out_of_range_offset() {
        let now = Utc::now();
        assert!(matches!(local_now(now, 24 * 60), Err(ApiError::BadRequest(_))));
    }
}
