//! Message entity models and DTOs.

use repairhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub work_order_id: DbId,
    pub sender_type: String,
    pub sender_name: String,
    pub body: String,
    pub client_key: Option<Uuid>,
    pub created_at: Timestamp,
}

/// A message as returned by thread listing, with the read flag
/// computed for the requesting reader role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThreadMessage {
    pub id: DbId,
    pub work_order_id: DbId,
    pub sender_type: String,
    pub sender_name: String,
    pub body: String,
    pub created_at: Timestamp,
    pub is_read: bool,
}

/// DTO for `POST /work-orders/{id}/messages`.
///
/// The body field is named `message` to match the wire format the
/// clients already send. `client_key` is an optional dedup key: a
/// retried request with the same key returns the original message.
#[derive(Debug, Deserialize)]
pub struct CreateMessage {
    pub message: String,
    pub client_key: Option<Uuid>,
}

/// DTO for `PUT /messages/mark-read`.
#[derive(Debug, Deserialize)]
pub struct MarkMessagesRead {
    pub message_ids: Vec<DbId>,
}
