//! Learner device endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{DeviceRegisterRequest, DeviceRegisterResponse, DeviceStatusResponse};
use crate::routes::auth::AuthenticatedDevice;
use crate::AppState;

/// POST /api/device/register
pub async fn register(
    State(state): State<AppState>,
    payload: Option<Json<DeviceRegisterRequest>>,
) -> Result<Json<DeviceRegisterResponse>> {
    let name = payload.and_then(|Json(p)| p.name);
    let device = state.db.create_device(name.as_deref()).await?;

    tracing::info!("Registered learner device {}", device.id);

    Ok(Json(DeviceRegisterResponse {
        device_id: device.id,
        token: device.token,
    }))
}

/// GET /api/device/status
pub async fn status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedDevice>,
) -> Result<Json<DeviceStatusResponse>> {
    let device = state
        .db
        .get_device_by_token(&auth.token)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Device {} not found", auth.device_id)))?;

    Ok(Json(DeviceStatusResponse {
        device_id: device.id,
        last_seen_at: device.last_seen_at,
    }))
}
