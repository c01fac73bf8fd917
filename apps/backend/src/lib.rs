pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::ReviewScheduler;

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub scheduler: Arc<ReviewScheduler>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(db),
            scheduler: Arc::new(ReviewScheduler::default()),
        }
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Device routes
        .route("/api/device/status", get(routes::device::status))
        // Progress routes
        .route(
            "/api/progress/words",
            get(routes::progress::list).post(routes::progress::create),
        )
        .route(
            "/api/progress/words/:id",
            get(routes::progress::get)
                .patch(routes::progress::update)
                .delete(routes::progress::delete),
        )
        .route("/api/progress/words-stats", get(routes::stats::words))
        // Review routes
        .route("/api/review", post(routes::review::submit))
        .route("/api/review/queue", post(routes::review::queue))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/device/register", post(routes::device::register))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let app = build_router(AppState::new(db));

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
