//! Domain events and notification dispatch.
//!
//! This crate defines the canonical event envelope
//! ([`WorkOrderEvent`]) emitted by work-order mutations, and the
//! [`NotificationDispatcher`] that turns each event into per-recipient
//! notification rows.
//!
//! Dispatch runs on the caller's transaction: either the mutation, its
//! event row, and its notifications all commit, or none do. Deduplication
//! is keyed on `(event_id, recipient_id)`, so retrying a dispatch for an
//! already-processed event creates nothing.

pub mod dispatcher;
pub mod event;

pub use dispatcher::NotificationDispatcher;
pub use event::WorkOrderEvent;
