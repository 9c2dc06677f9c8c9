pub mod device;
pub mod message;
pub mod notification;
pub mod work_order;
