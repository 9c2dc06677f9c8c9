//! Repository for the `devices` table.

use repairhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::device::{CreateDevice, Device};

/// Column list for `devices` queries.
const COLUMNS: &str = "id, customer_id, device_type, brand, model, created_at";

/// Provides read/write operations for devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Register a device for a customer, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        customer_id: DbId,
        input: &CreateDevice,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (customer_id, device_type, brand, model) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(customer_id)
            .bind(&input.device_type)
            .bind(&input.brand)
            .bind(&input.model)
            .fetch_one(pool)
            .await
    }

    /// Fetch a device by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
