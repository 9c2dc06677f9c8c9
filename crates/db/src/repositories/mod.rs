//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that participate in a transaction take `&mut PgConnection`
//! so callers can pass a transaction handle; pool-level reads take
//! `&PgPool`.

pub mod device_repo;
pub mod event_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod user_repo;
pub mod work_order_repo;

pub use device_repo::DeviceRepo;
pub use event_repo::EventRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use user_repo::UserRepo;
pub use work_order_repo::WorkOrderRepo;
