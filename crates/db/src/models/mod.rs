//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the requests that create or mutate it

pub mod device;
pub mod event;
pub mod message;
pub mod notification;
pub mod user;
pub mod work_order;
