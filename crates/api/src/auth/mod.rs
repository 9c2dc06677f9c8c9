//! Authentication building blocks.
//!
//! Session issuance lives outside this service; here we only validate
//! the HS256 access tokens the external auth system mints.

pub mod jwt;
