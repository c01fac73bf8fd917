//! Word progress queries
//!
//! Functions take a connection so the review flow can run them inside one
//! transaction while the repository methods on `Database` use the pool.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{DbWordProgress, NewWordProgress, ProgressState};

const COLUMNS: &str = "id, device_id, word_id, target_language_id, status, interval_days, \
     next_review, review_count, correct_count, date_learned, created_at, updated_at";

fn to_db_count(value: u32, field: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| ApiError::BadRequest(format!("{field} out of range")))
}

/// List progress records for a device
pub async fn list(
    conn: &mut PgConnection,
    device_id: Uuid,
    language_id: Option<i64>,
    word_id: Option<i64>,
) -> Result<Vec<DbWordProgress>> {
    let sql = format!(
        r#"
        SELECT {COLUMNS}
        FROM word_progress
        WHERE device_id = $1
          AND ($2::BIGINT IS NULL OR target_language_id = $2)
          AND ($3::BIGINT IS NULL OR word_id = $3)
        ORDER BY id
        "#
    );
    let rows = sqlx::query_as::<_, DbWordProgress>(&sql)
        .bind(device_id)
        .bind(language_id)
        .bind(word_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows)
}

/// Get a progress record by ID, locking the row when `for_update` is set
pub async fn get(
    conn: &mut PgConnection,
    device_id: Uuid,
    progress_id: i64,
    for_update: bool,
) -> Result<Option<DbWordProgress>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM word_progress WHERE device_id = $1 AND id = $2 {}",
        if for_update { "FOR UPDATE" } else { "" }
    );
    let row = sqlx::query_as::<_, DbWordProgress>(&sql)
        .bind(device_id)
        .bind(progress_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}

/// Find the record for a word, locking the row when `for_update` is set
pub async fn find_by_word(
    conn: &mut PgConnection,
    device_id: Uuid,
    word_id: i64,
    language_id: i64,
    for_update: bool,
) -> Result<Option<DbWordProgress>> {
    let sql = format!(
        r#"
        SELECT {COLUMNS}
        FROM word_progress
        WHERE device_id = $1 AND word_id = $2 AND target_language_id = $3
        {}
        "#,
        if for_update { "FOR UPDATE" } else { "" }
    );
    let row = sqlx::query_as::<_, DbWordProgress>(&sql)
        .bind(device_id)
        .bind(word_id)
        .bind(language_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}

/// Insert a record unless the word is already tracked.
///
/// Returns `None` when another record for the same word and language exists.
pub async fn insert_if_absent(
    conn: &mut PgConnection,
    device_id: Uuid,
    new: &NewWordProgress,
) -> Result<Option<DbWordProgress>> {
    let sql = format!(
        r#"
        INSERT INTO word_progress (device_id, word_id, target_language_id, status, interval_days,
                                   next_review, review_count, correct_count, date_learned)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (device_id, word_id, target_language_id) DO NOTHING
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DbWordProgress>(&sql)
        .bind(device_id)
        .bind(new.word_id)
        .bind(new.target_language_id)
        .bind(new.state.status.as_str())
        .bind(new.state.interval)
        .bind(new.state.next_review)
        .bind(to_db_count(new.state.review_count, "review_count")?)
        .bind(to_db_count(new.state.correct_count, "correct_count")?)
        .bind(new.state.date_learned)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}

/// Overwrite the scheduling fields of a record
pub async fn write_state(
    conn: &mut PgConnection,
    device_id: Uuid,
    progress_id: i64,
    state: &ProgressState,
) -> Result<Option<DbWordProgress>> {
    let sql = format!(
        r#"
        UPDATE word_progress
        SET status = $3,
            interval_days = $4,
            next_review = $5,
            review_count = $6,
            correct_count = $7,
            date_learned = $8,
            updated_at = NOW()
        WHERE device_id = $1 AND id = $2
        RETURNING {COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DbWordProgress>(&sql)
        .bind(device_id)
        .bind(progress_id)
        .bind(state.status.as_str())
        .bind(state.interval)
        .bind(state.next_review)
        .bind(to_db_count(state.review_count, "review_count")?)
        .bind(to_db_count(state.correct_count, "correct_count")?)
        .bind(state.date_learned)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}
