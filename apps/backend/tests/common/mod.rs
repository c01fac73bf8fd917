//! Common test utilities and fixtures for integration tests.
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use axum_test::TestServer;
use uuid::Uuid;

use vocab_backend::db::Database;
use vocab_backend::{build_router, AppState};

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(db);
        let db = state.db.clone();
        let app = build_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Start a test server over the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }

    /// Create a test device and return its ID and token.
    pub async fn create_test_device(&self, name: Option<&str>) -> (Uuid, String) {
        let device = self
            .db
            .create_device(name)
            .await
            .expect("Failed to create test device");
        (device.id, device.token)
    }

    /// Authorization header value for a device token.
    pub fn auth_header_value(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid token header")
    }

    /// Remove a device and its progress.
    pub async fn cleanup_device(&self, device_id: Uuid) {
        let _ = sqlx::query("DELETE FROM word_progress WHERE device_id = $1")
            .bind(device_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(device_id)
            .execute(self.db.pool())
            .await;
    }
}
