//! Notification entity model.

use repairhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// Notifications are created only by the dispatcher; the API surface
/// mutates nothing but the read flag (and recipient-scoped deletion
/// via "clear all").
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub event_id: DbId,
    pub recipient_id: DbId,
    pub recipient_role: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub work_order_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
