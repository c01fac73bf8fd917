//! PostgreSQL database operations

pub mod progress;

use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Start a transaction
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    // === Device Repository ===

    /// Create a new device with generated token
    pub async fn create_device(&self, name: Option<&str>) -> Result<Device> {
        let token = Uuid::new_v4().to_string();
        let device = sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(device)
    }

    /// Get device by token
    pub async fn get_device_by_token(&self, token: &str) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM devices
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(device)
    }

    /// Update device last_seen_at timestamp
    pub async fn update_last_seen(&self, device_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE devices
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(device_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Word Progress Repository ===

    /// List progress records, optionally filtered by language and word
    pub async fn list_word_progress(
        &self,
        device_id: Uuid,
        language_id: Option<i64>,
        word_id: Option<i64>,
    ) -> Result<Vec<DbWordProgress>> {
        let mut conn = self.pool.acquire().await?;
        progress::list(&mut *conn, device_id, language_id, word_id).await
    }

    /// Get progress record by ID
    pub async fn get_word_progress(
        &self,
        device_id: Uuid,
        progress_id: i64,
    ) -> Result<Option<DbWordProgress>> {
        let mut conn = self.pool.acquire().await?;
        progress::get(&mut *conn, device_id, progress_id, false).await
    }

    /// Create a progress record; fails with Conflict when the word is already tracked
    pub async fn create_word_progress(
        &self,
        device_id: Uuid,
        new: &NewWordProgress,
    ) -> Result<DbWordProgress> {
        let mut conn = self.pool.acquire().await?;
        progress::insert_if_absent(&mut *conn, device_id, new)
            .await?
            .ok_or_else(|| {
                ApiError::Conflict(format!(
                    "progress already exists for word {} in language {}",
                    new.word_id, new.target_language_id
                ))
            })
    }

    /// Delete a progress record
    pub async fn delete_word_progress(&self, device_id: Uuid, progress_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM word_progress
            WHERE device_id = $1 AND id = $2
            "#,
        )
        .bind(device_id)
        .bind(progress_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Status counts per language
    pub async fn get_status_counts(
        &self,
        device_id: Uuid,
        language_id: Option<i64>,
    ) -> Result<Vec<StatusCountRow>> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            r#"
            SELECT target_language_id,
                   status,
                   COUNT(*)::BIGINT as words,
                   COALESCE(SUM(review_count), 0)::BIGINT as reviews,
                   COALESCE(SUM(correct_count), 0)::BIGINT as correct
            FROM word_progress
            WHERE device_id = $1
              AND ($2::BIGINT IS NULL OR target_language_id = $2)
            GROUP BY target_language_id, status
            ORDER BY target_language_id, status
            "#,
        )
        .bind(device_id)
        .bind(language_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
