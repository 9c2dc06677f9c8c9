//! Domain event entity model.

use repairhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_type: String,
    pub work_order_id: DbId,
    pub actor_user_id: Option<DbId>,
    pub actor_role: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
