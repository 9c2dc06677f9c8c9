//! Well-known role name constants and role helpers.
//!
//! These must match the seed data and CHECK constraints in
//! `db/migrations`.

use crate::error::CoreError;

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_ADMIN: &str = "admin";

/// All valid user roles.
pub const VALID_ROLES: &[&str] = &[ROLE_CUSTOMER, ROLE_TECHNICIAN, ROLE_ADMIN];

/// Reader role under which customers track message reads.
pub const READER_CUSTOMER: &str = "customer";

/// Reader role shared by technicians and admins for message reads.
///
/// Staff share one read set per work order: once any staff member has
/// seen a customer message, it no longer counts as unread for the shop.
pub const READER_STAFF: &str = "staff";

/// Returns `true` for shop-side roles (technician, admin).
pub fn is_staff(role: &str) -> bool {
    role == ROLE_TECHNICIAN || role == ROLE_ADMIN
}

/// Map a user role to the reader role used for message read tracking.
pub fn reader_role_for(role: &str) -> &'static str {
    if is_staff(role) {
        READER_STAFF
    } else {
        READER_CUSTOMER
    }
}

/// Validate that a role string is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {VALID_ROLES:?}"
        )))
    }
}
