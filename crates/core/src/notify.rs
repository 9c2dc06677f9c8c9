//! Notification kind constants and title/body builders.
//!
//! The dispatcher decides *who* gets notified; this module decides
//! *what* the notification says. Keeping the copy here means the text
//! shown in the customer portal bell and the admin console stays
//! consistent and unit-testable.

use crate::types::DbId;
use crate::work_order::status_label;

// ---------------------------------------------------------------------------
// Notification kinds
// ---------------------------------------------------------------------------

/// The order moved to a new non-terminal status (or was cancelled).
pub const KIND_STATUS_CHANGE: &str = "status_change";
/// A technician note was recorded on the order.
pub const KIND_TECH_NOTE: &str = "tech_note";
/// A new thread message arrived.
pub const KIND_MESSAGE: &str = "message";
/// The repair is finished.
pub const KIND_COMPLETED: &str = "completed";

/// All valid notification kinds.
pub const VALID_KINDS: &[&str] = &[KIND_STATUS_CHANGE, KIND_TECH_NOTE, KIND_MESSAGE, KIND_COMPLETED];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Customer-facing notice for a status change into a non-terminal state.
pub fn status_change_notice(work_order_id: DbId, new_status: &str) -> (String, String) {
    (
        "Repair status updated".to_string(),
        format!(
            "Your repair #{work_order_id} is now {}",
            status_label(new_status)
        ),
    )
}

/// Customer-facing notice for a completed repair.
pub fn completed_notice(work_order_id: DbId) -> (String, String) {
    (
        "Repair completed".to_string(),
        format!("Your repair #{work_order_id} is complete and ready for pickup"),
    )
}

/// Staff-facing notice when a customer cancels a pending order.
pub fn cancelled_by_customer_notice(work_order_id: DbId) -> (String, String) {
    (
        "Work order cancelled".to_string(),
        format!("The customer cancelled work order #{work_order_id}"),
    )
}

/// Customer-facing notice when the shop cancels an order.
pub fn cancelled_by_staff_notice(work_order_id: DbId) -> (String, String) {
    (
        "Repair cancelled".to_string(),
        format!("Your repair #{work_order_id} was cancelled by the shop"),
    )
}

/// Notice for a new thread message, shown to the other party.
pub fn message_notice(sender_name: &str, work_order_id: DbId) -> (String, String) {
    (
        "New message".to_string(),
        format!("{sender_name} sent a message on repair #{work_order_id}"),
    )
}

/// Customer-facing notice for a technician note recorded on the order.
pub fn tech_note_notice(work_order_id: DbId) -> (String, String) {
    (
        "Technician note added".to_string(),
        format!("A technician added a note to your repair #{work_order_id}"),
    )
}
