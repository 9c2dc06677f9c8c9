//! Device entity model and DTOs.

use repairhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub customer_id: DbId,
    pub device_type: String,
    pub brand: String,
    pub model: String,
    pub created_at: Timestamp,
}

/// DTO for registering a device.
#[derive(Debug, Deserialize)]
pub struct CreateDevice {
    pub device_type: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
}
