//! Event-to-notification routing.
//!
//! [`NotificationDispatcher`] materializes notification rows for each
//! domain event. The routing rules are deterministic and evaluated
//! exactly once per event:
//!
//! - status -> `in_progress` / `waiting_for_parts`: notify the owning
//!   customer (`status_change`).
//! - status -> `completed`: notify the owning customer (`completed`).
//! - status -> `cancelled` by the customer: notify all active staff;
//!   by staff: notify the owning customer. The asymmetry is
//!   intentional -- each side is told about the other's action, never
//!   its own.
//! - message from the customer: notify all active staff (`message`);
//!   from staff: notify the owning customer (`message`); from the
//!   system: notify the owning customer (`tech_note`).

use repairhub_core::types::DbId;
use repairhub_core::{message, notify, roles, work_order};
use repairhub_db::models::work_order::WorkOrder;
use repairhub_db::repositories::{EventRepo, NotificationRepo, UserRepo};
use sqlx::PgConnection;

use crate::event::WorkOrderEvent;

/// A notification the routing rules decided to create.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNotification {
    pub recipient_id: DbId,
    pub recipient_role: String,
    pub kind: &'static str,
    pub title: String,
    pub body: String,
}

/// Routes domain events to per-recipient notification rows.
pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Persist the event and dispatch its notifications on the given
    /// connection (normally a transaction).
    ///
    /// Returns the number of notifications created.
    pub async fn record_and_dispatch(
        conn: &mut PgConnection,
        order: &WorkOrder,
        event: &WorkOrderEvent,
    ) -> Result<u64, sqlx::Error> {
        let event_id = EventRepo::insert(
            conn,
            event.event_type(),
            event.work_order_id(),
            event.actor_user_id(),
            event.actor_role(),
            &event.payload(),
        )
        .await?;

        Self::dispatch(conn, event_id, order, event).await
    }

    /// Dispatch notifications for an already-persisted event.
    ///
    /// Idempotent with respect to `event_id`: recipients that already
    /// have a row for this event are skipped, so a retry after a
    /// partial failure cannot duplicate deliveries.
    pub async fn dispatch(
        conn: &mut PgConnection,
        event_id: DbId,
        order: &WorkOrder,
        event: &WorkOrderEvent,
    ) -> Result<u64, sqlx::Error> {
        let staff = if targets_staff(event) {
            UserRepo::active_staff(conn).await?
        } else {
            Vec::new()
        };

        let mut created = 0;
        for planned in plan(order, event, &staff) {
            let inserted = NotificationRepo::create(
                conn,
                event_id,
                planned.recipient_id,
                &planned.recipient_role,
                planned.kind,
                &planned.title,
                &planned.body,
                Some(order.id),
            )
            .await?;

            match inserted {
                Some(_) => created += 1,
                None => tracing::debug!(
                    event_id,
                    recipient_id = planned.recipient_id,
                    "Notification already exists for event, skipping"
                ),
            }
        }

        tracing::debug!(
            event_id,
            event_type = event.event_type(),
            created,
            "Dispatched event"
        );
        Ok(created)
    }
}

/// Whether this event fans out to the shop rather than the customer.
fn targets_staff(event: &WorkOrderEvent) -> bool {
    match event {
        WorkOrderEvent::StatusChanged {
            new_status,
            actor_role,
            ..
        } => new_status == work_order::STATUS_CANCELLED && actor_role == roles::ROLE_CUSTOMER,
        WorkOrderEvent::MessageAppended { sender_type, .. } => {
            sender_type == message::SENDER_CUSTOMER
        }
    }
}

/// Evaluate the routing rules for one event.
///
/// Pure: given the order, the event, and the current staff roster,
/// returns the exact set of notifications to create. `staff` is only
/// consulted for customer-originated events.
pub fn plan(
    order: &WorkOrder,
    event: &WorkOrderEvent,
    staff: &[(DbId, String)],
) -> Vec<PlannedNotification> {
    match event {
        WorkOrderEvent::StatusChanged {
            work_order_id,
            new_status,
            actor_role,
            ..
        } => match new_status.as_str() {
            work_order::STATUS_IN_PROGRESS | work_order::STATUS_WAITING_FOR_PARTS => {
                let (title, body) = notify::status_change_notice(*work_order_id, new_status);
                vec![for_customer(order, notify::KIND_STATUS_CHANGE, title, body)]
            }
            work_order::STATUS_COMPLETED => {
                let (title, body) = notify::completed_notice(*work_order_id);
                vec![for_customer(order, notify::KIND_COMPLETED, title, body)]
            }
            work_order::STATUS_CANCELLED => {
                if actor_role == roles::ROLE_CUSTOMER {
                    let (title, body) = notify::cancelled_by_customer_notice(*work_order_id);
                    for_staff(staff, notify::KIND_STATUS_CHANGE, &title, &body)
                } else {
                    let (title, body) = notify::cancelled_by_staff_notice(*work_order_id);
                    vec![for_customer(order, notify::KIND_STATUS_CHANGE, title, body)]
                }
            }
            _ => Vec::new(),
        },

        WorkOrderEvent::MessageAppended {
            work_order_id,
            sender_type,
            sender_name,
            ..
        } => match sender_type.as_str() {
            message::SENDER_CUSTOMER => {
                let (title, body) = notify::message_notice(sender_name, *work_order_id);
                for_staff(staff, notify::KIND_MESSAGE, &title, &body)
            }
            message::SENDER_TECHNICIAN | message::SENDER_ADMIN => {
                let (title, body) = notify::message_notice(sender_name, *work_order_id);
                vec![for_customer(order, notify::KIND_MESSAGE, title, body)]
            }
            message::SENDER_SYSTEM => {
                let (title, body) = notify::tech_note_notice(*work_order_id);
                vec![for_customer(order, notify::KIND_TECH_NOTE, title, body)]
            }
            _ => Vec::new(),
        },
    }
}

fn for_customer(
    order: &WorkOrder,
    kind: &'static str,
    title: String,
    body: String,
) -> PlannedNotification {
    PlannedNotification {
        recipient_id: order.customer_id,
        recipient_role: roles::ROLE_CUSTOMER.to_string(),
        kind,
        title,
        body,
    }
}

fn for_staff(
    staff: &[(DbId, String)],
    kind: &'static str,
    title: &str,
    body: &str,
) -> Vec<PlannedNotification> {
    staff
        .iter()
        .map(|(id, role)| PlannedNotification {
            recipient_id: *id,
            recipient_role: role.clone(),
            kind,
            title: title.to_string(),
            body: body.to_string(),
        })
        .collect()
}
