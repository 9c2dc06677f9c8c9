//! Domain logic for the repair-shop work-order platform.
//!
//! This crate is pure logic with no I/O: status graph and transition
//! authorization for work orders, role and sender-type validation, and
//! notification kind constants with title/body builders. The database
//! and API layers build on these rules.

pub mod error;
pub mod message;
pub mod notify;
pub mod roles;
pub mod types;
pub mod work_order;
