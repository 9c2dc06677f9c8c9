//! Work-order status constants, the transition graph, and actor
//! authorization rules.
//!
//! The status graph is the authoritative lifecycle:
//!
//! ```text
//! pending -> in_progress -> waiting_for_parts -> completed
//!                 ^________________|
//! ```
//!
//! `cancelled` is reachable from `pending`, `in_progress`, and
//! `waiting_for_parts`. `completed` and `cancelled` are terminal.

use crate::error::CoreError;
use crate::roles;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status for a newly submitted repair request.
pub const STATUS_PENDING: &str = "pending";
/// A technician is actively working on the device.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// Work is blocked until replacement parts arrive.
pub const STATUS_WAITING_FOR_PARTS: &str = "waiting_for_parts";
/// The repair is finished and the device is ready for pickup.
pub const STATUS_COMPLETED: &str = "completed";
/// The order was cancelled before completion.
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid work-order statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_WAITING_FOR_PARTS,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Priority constants
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// All valid work-order priorities.
pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Maximum length for the customer-provided issue description (characters).
pub const MAX_ISSUE_DESCRIPTION_LENGTH: usize = 10_000;

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid work order status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Validate that a priority string is one of the known priorities.
pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Must be one of: {VALID_PRIORITIES:?}"
        )))
    }
}

/// Validate the issue description supplied on a new repair request.
pub fn validate_issue_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Issue description must not be empty".to_string(),
        ));
    }
    if description.len() > MAX_ISSUE_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Issue description exceeds maximum length of {MAX_ISSUE_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// Transition rules:
/// - `pending`           -> `in_progress`, `cancelled`
/// - `in_progress`       -> `waiting_for_parts`, `completed`, `cancelled`
/// - `waiting_for_parts` -> `in_progress`, `completed`, `cancelled`
/// - `completed`         -> (terminal)
/// - `cancelled`         -> (terminal)
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_IN_PROGRESS, STATUS_CANCELLED],
        STATUS_IN_PROGRESS => &[STATUS_WAITING_FOR_PARTS, STATUS_COMPLETED, STATUS_CANCELLED],
        STATUS_WAITING_FOR_PARTS => &[STATUS_IN_PROGRESS, STATUS_COMPLETED, STATUS_CANCELLED],
        _ => &[],
    }
}

/// Returns `true` once a work order can no longer change status.
pub fn is_terminal(status: &str) -> bool {
    status == STATUS_COMPLETED || status == STATUS_CANCELLED
}

/// Validate that a status transition from `current` to `next` follows
/// an edge of the lifecycle graph.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::IllegalTransition(format!(
            "Cannot transition work order from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}

/// Validate that the acting role may perform the transition at all.
///
/// Technicians and admins may make any legal graph transition. A
/// customer may only cancel their own order, and only while it is
/// still `pending` -- work already in progress cannot be cancelled
/// from the portal.
pub fn authorize_transition(
    actor_role: &str,
    is_owner: bool,
    current: &str,
    next: &str,
) -> Result<(), CoreError> {
    if roles::is_staff(actor_role) {
        return Ok(());
    }

    if actor_role == roles::ROLE_CUSTOMER {
        if !is_owner {
            return Err(CoreError::Forbidden(
                "Customers may only act on their own work orders".to_string(),
            ));
        }
        if next != STATUS_CANCELLED {
            return Err(CoreError::IllegalTransition(
                "Customers may only cancel a work order".to_string(),
            ));
        }
        if current != STATUS_PENDING {
            return Err(CoreError::IllegalTransition(format!(
                "A work order can only be cancelled by the customer while pending (current status: '{current}')"
            )));
        }
        return Ok(());
    }

    Err(CoreError::Forbidden(format!(
        "Role '{actor_role}' may not change work order status"
    )))
}

/// Human-readable label for a status, e.g. `"waiting_for_parts"` ->
/// `"Waiting For Parts"`. Used in notification bodies.
pub fn status_label(status: &str) -> String {
    status
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_transition_follows_the_graph() {
        // The full edge list, exhaustively.
        let edges = [
            (STATUS_PENDING, STATUS_IN_PROGRESS),
            (STATUS_PENDING, STATUS_CANCELLED),
            (STATUS_IN_PROGRESS, STATUS_WAITING_FOR_PARTS),
            (STATUS_IN_PROGRESS, STATUS_COMPLETED),
            (STATUS_IN_PROGRESS, STATUS_CANCELLED),
            (STATUS_WAITING_FOR_PARTS, STATUS_IN_PROGRESS),
            (STATUS_WAITING_FOR_PARTS, STATUS_COMPLETED),
            (STATUS_WAITING_FOR_PARTS, STATUS_CANCELLED),
        ];

        for from in VALID_STATUSES {
            for to in VALID_STATUSES {
                let legal = edges.contains(&(*from, *to));
                assert_eq!(
                    validate_transition(from, to).is_ok(),
                    legal,
                    "transition {from} -> {to} legality mismatch"
                );
            }
        }
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        assert!(valid_transitions(STATUS_COMPLETED).is_empty());
        assert!(valid_transitions(STATUS_CANCELLED).is_empty());
        assert!(is_terminal(STATUS_COMPLETED));
        assert!(is_terminal(STATUS_CANCELLED));
        assert!(!is_terminal(STATUS_PENDING));
    }

    #[test]
    fn no_transition_skips_pending_to_completed() {
        assert!(validate_transition(STATUS_PENDING, STATUS_COMPLETED).is_err());
        assert!(validate_transition(STATUS_PENDING, STATUS_WAITING_FOR_PARTS).is_err());
    }

    #[test]
    fn staff_may_make_any_graph_transition() {
        assert!(
            authorize_transition(roles::ROLE_TECHNICIAN, false, STATUS_PENDING, STATUS_IN_PROGRESS)
                .is_ok()
        );
        assert!(
            authorize_transition(roles::ROLE_ADMIN, false, STATUS_IN_PROGRESS, STATUS_CANCELLED)
                .is_ok()
        );
    }

    #[test]
    fn customer_cancel_allowed_only_while_pending() {
        assert!(
            authorize_transition(roles::ROLE_CUSTOMER, true, STATUS_PENDING, STATUS_CANCELLED)
                .is_ok()
        );

        for current in [
            STATUS_IN_PROGRESS,
            STATUS_WAITING_FOR_PARTS,
            STATUS_COMPLETED,
            STATUS_CANCELLED,
        ] {
            assert!(
                authorize_transition(roles::ROLE_CUSTOMER, true, current, STATUS_CANCELLED)
                    .is_err(),
                "customer cancel from {current} must be rejected"
            );
        }
    }

    #[test]
    fn customer_may_not_transition_to_other_statuses() {
        assert!(
            authorize_transition(roles::ROLE_CUSTOMER, true, STATUS_PENDING, STATUS_IN_PROGRESS)
                .is_err()
        );
    }

    #[test]
    fn customer_may_not_cancel_someone_elses_order() {
        let result =
            authorize_transition(roles::ROLE_CUSTOMER, false, STATUS_PENDING, STATUS_CANCELLED);
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(validate_status("shipped").is_err());
        assert!(validate_status(STATUS_WAITING_FOR_PARTS).is_ok());
    }

    #[test]
    fn priority_validation() {
        assert!(validate_priority(PRIORITY_HIGH).is_ok());
        assert!(validate_priority("urgent").is_err());
    }

    #[test]
    fn issue_description_must_be_nonempty() {
        assert!(validate_issue_description("  ").is_err());
        assert!(validate_issue_description("Cracked screen").is_ok());
    }

    #[test]
    fn status_label_formats_snake_case() {
        assert_eq!(status_label(STATUS_WAITING_FOR_PARTS), "Waiting For Parts");
        assert_eq!(status_label(STATUS_IN_PROGRESS), "In Progress");
        assert_eq!(status_label(STATUS_PENDING), "Pending");
    }
}
