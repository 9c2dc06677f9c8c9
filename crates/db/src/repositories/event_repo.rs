//! Repository for the `events` table.

use repairhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::event::Event;

/// Column list for `events` queries.
const COLUMNS: &str = "id, event_type, work_order_id, actor_user_id, actor_role, payload, created_at";

/// Provides operations for domain events.
///
/// Events are inserted in the same transaction as the mutation that
/// caused them; the returned id keys notification deduplication.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event row, returning the generated ID.
    pub async fn insert(
        conn: &mut PgConnection,
        event_type: &str,
        work_order_id: DbId,
        actor_user_id: Option<DbId>,
        actor_role: &str,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events (event_type, work_order_id, actor_user_id, actor_role, payload) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(work_order_id)
        .bind(actor_user_id)
        .bind(actor_role)
        .bind(payload)
        .fetch_one(conn)
        .await
    }

    /// List a work order's events in insertion order (its audit trail).
    pub async fn list_for_work_order(
        pool: &PgPool,
        work_order_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE work_order_id = $1 ORDER BY id");
        sqlx::query_as::<_, Event>(&query)
            .bind(work_order_id)
            .fetch_all(pool)
            .await
    }
}
