//! Device registration handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use repairhub_core::error::CoreError;
use repairhub_core::roles;
use repairhub_core::types::DbId;
use repairhub_db::models::device::{CreateDevice, Device};
use repairhub_db::repositories::DeviceRepo;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `POST /api/v1/devices`
///
/// Customers register a device before submitting repair requests
/// against it.
pub async fn register_device(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateDevice>,
) -> Result<(StatusCode, Json<DataResponse<Device>>), AppError> {
    if auth.role != roles::ROLE_CUSTOMER {
        return Err(AppError::Forbidden(
            "Only customers may register devices".into(),
        ));
    }
    if input.device_type.trim().is_empty() {
        return Err(CoreError::Validation("Device type must not be empty".into()).into());
    }

    let device = DeviceRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// `GET /api/v1/devices/{id}`
pub async fn get_device(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<DataResponse<Device>>, AppError> {
    let device = DeviceRepo::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("device {id}")))?;

    if !auth.is_staff() && device.customer_id != auth.user_id {
        return Err(AppError::NotFound(format!("device {id}")));
    }

    Ok(Json(DataResponse { data: device }))
}
