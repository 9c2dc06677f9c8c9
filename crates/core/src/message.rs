//! Message sender-type constants and thread validation helpers.

use crate::error::CoreError;
use crate::roles;

// ---------------------------------------------------------------------------
// Sender types
// ---------------------------------------------------------------------------

pub const SENDER_CUSTOMER: &str = "customer";
pub const SENDER_TECHNICIAN: &str = "technician";
pub const SENDER_ADMIN: &str = "admin";
/// Messages generated by the server itself, e.g. a technician note
/// recorded during a status update.
pub const SENDER_SYSTEM: &str = "system";

/// All valid message sender types.
pub const VALID_SENDER_TYPES: &[&str] = &[
    SENDER_CUSTOMER,
    SENDER_TECHNICIAN,
    SENDER_ADMIN,
    SENDER_SYSTEM,
];

/// Maximum length for a message body (characters).
pub const MAX_BODY_LENGTH: usize = 5_000;

/// Map a user role to the sender type stamped on their messages.
pub fn sender_type_for_role(role: &str) -> &'static str {
    match role {
        roles::ROLE_TECHNICIAN => SENDER_TECHNICIAN,
        roles::ROLE_ADMIN => SENDER_ADMIN,
        _ => SENDER_CUSTOMER,
    }
}

/// Validate a message body: non-empty after trimming, within length limits.
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation(
            "Message body must not be empty".to_string(),
        ));
    }
    if body.len() > MAX_BODY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message body exceeds maximum length of {MAX_BODY_LENGTH} characters"
        )));
    }
    Ok(())
}
