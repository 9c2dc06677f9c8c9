//! Work-order entity model and DTOs.

use repairhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `work_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrder {
    pub id: DbId,
    pub customer_id: DbId,
    pub device_id: DbId,
    pub status: String,
    pub priority: String,
    pub issue_description: String,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub technician_notes: Option<String>,
    /// Optimistic-concurrency counter, bumped on every status transition.
    pub version: i64,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// DTO for a customer submitting a repair request.
#[derive(Debug, Deserialize)]
pub struct CreateWorkOrder {
    pub device_id: DbId,
    pub issue_description: String,
    pub priority: Option<String>,
}

/// DTO for `PATCH /work-orders/{id}/status`.
///
/// `version` is the version the caller last observed; the transition is
/// rejected with a conflict if it no longer matches.
#[derive(Debug, Deserialize)]
pub struct UpdateStatus {
    pub status: String,
    pub version: i64,
    pub technician_notes: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
}

/// Query filters for the staff work-order listing.
#[derive(Debug, Deserialize)]
pub struct WorkOrderFilter {
    pub status: Option<String>,
    pub customer_id: Option<DbId>,
}
