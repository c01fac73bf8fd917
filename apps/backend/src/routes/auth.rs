//! Device token authentication
//!
//! Every learner is a registered device; progress rows are scoped to it.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::AppState;

/// Authenticated learner device stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedDevice {
    pub device_id: Uuid,
    pub token: String,
}

/// Extract the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))
}

/// Resolve the device token and attach the device to the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())?.to_string();

    let device = state
        .db
        .get_device_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid device token".to_string()))?;

    state.db.update_last_seen(device.id).await?;

    request.extensions_mut().insert(AuthenticatedDevice {
        device_id: device.id,
        token,
    });

    Ok(next.run(request).await)
}
