//! The canonical domain event envelope for work-order mutations.

use repairhub_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Event type name for status transitions.
pub const EVENT_STATUS_CHANGED: &str = "work_order.status_changed";
/// Event type name for thread message appends.
pub const EVENT_MESSAGE_APPENDED: &str = "work_order.message_appended";

/// A domain event emitted by an accepted work-order mutation.
///
/// Events are persisted in the same transaction as the mutation; the
/// persisted row's id is the stable key for notification deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkOrderEvent {
    /// An accepted status transition.
    StatusChanged {
        work_order_id: DbId,
        old_status: String,
        new_status: String,
        actor_user_id: DbId,
        actor_role: String,
    },

    /// A message was appended to the order's thread.
    MessageAppended {
        work_order_id: DbId,
        message_id: DbId,
        sender_type: String,
        sender_name: String,
        actor_user_id: Option<DbId>,
        actor_role: String,
    },
}

impl WorkOrderEvent {
    /// Dot-separated event type name, e.g. `"work_order.status_changed"`.
    pub fn event_type(&self) -> &'static str {
        match self {
            WorkOrderEvent::StatusChanged { .. } => EVENT_STATUS_CHANGED,
            WorkOrderEvent::MessageAppended { .. } => EVENT_MESSAGE_APPENDED,
        }
    }

    /// The work order this event concerns.
    pub fn work_order_id(&self) -> DbId {
        match self {
            WorkOrderEvent::StatusChanged { work_order_id, .. }
            | WorkOrderEvent::MessageAppended { work_order_id, .. } => *work_order_id,
        }
    }

    /// The user that triggered the event, if any (system messages have
    /// an actor only when a staff member recorded them).
    pub fn actor_user_id(&self) -> Option<DbId> {
        match self {
            WorkOrderEvent::StatusChanged { actor_user_id, .. } => Some(*actor_user_id),
            WorkOrderEvent::MessageAppended { actor_user_id, .. } => *actor_user_id,
        }
    }

    /// The role of the acting party.
    pub fn actor_role(&self) -> &str {
        match self {
            WorkOrderEvent::StatusChanged { actor_role, .. }
            | WorkOrderEvent::MessageAppended { actor_role, .. } => actor_role,
        }
    }

    /// Event-specific data persisted in the `events.payload` column.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            WorkOrderEvent::StatusChanged {
                old_status,
                new_status,
                ..
            } => serde_json::json!({
                "old_status": old_status,
                "new_status": new_status,
            }),
            WorkOrderEvent::MessageAppended {
                message_id,
                sender_type,
                sender_name,
                ..
            } => serde_json::json!({
                "message_id": message_id,
                "sender_type": sender_type,
                "sender_name": sender_name,
            }),
        }
    }
}
