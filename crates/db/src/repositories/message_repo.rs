//! Repository for the `messages` and `message_reads` tables.

use repairhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::message::{Message, ThreadMessage};

/// Column list for `messages` queries.
const COLUMNS: &str = "id, work_order_id, sender_type, sender_name, body, client_key, created_at";

/// Provides append/read operations for per-order message threads.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message to a work order's thread.
    ///
    /// Runs on a connection so the caller can tie the append to the
    /// event and notification writes it triggers.
    pub async fn insert(
        conn: &mut PgConnection,
        work_order_id: DbId,
        sender_type: &str,
        sender_name: &str,
        body: &str,
        client_key: Option<Uuid>,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (work_order_id, sender_type, sender_name, body, client_key) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(work_order_id)
            .bind(sender_type)
            .bind(sender_name)
            .bind(body)
            .bind(client_key)
            .fetch_one(conn)
            .await
    }

    /// Find a previously appended message by its client dedup key.
    pub async fn find_by_client_key(
        pool: &PgPool,
        work_order_id: DbId,
        client_key: Uuid,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM messages WHERE work_order_id = $1 AND client_key = $2");
        sqlx::query_as::<_, Message>(&query)
            .bind(work_order_id)
            .bind(client_key)
            .fetch_optional(pool)
            .await
    }

    /// List messages with id greater than `since_id`, in total
    /// (created_at, id) order, with the read flag computed for the
    /// given reader role.
    pub async fn list_since(
        pool: &PgPool,
        work_order_id: DbId,
        since_id: DbId,
        reader_role: &str,
    ) -> Result<Vec<ThreadMessage>, sqlx::Error> {
        sqlx::query_as::<_, ThreadMessage>(
            "SELECT m.id, m.work_order_id, m.sender_type, m.sender_name, m.body, m.created_at, \
                    (r.message_id IS NOT NULL) AS is_read \
             FROM messages m \
             LEFT JOIN message_reads r \
                    ON r.message_id = m.id AND r.reader_role = $3 \
             WHERE m.work_order_id = $1 AND m.id > $2 \
             ORDER BY m.created_at, m.id",
        )
        .bind(work_order_id)
        .bind(since_id)
        .bind(reader_role)
        .fetch_all(pool)
        .await
    }

    /// Add message ids to a reader role's read set.
    ///
    /// Idempotent: already-read ids are skipped via ON CONFLICT. When
    /// `owning_customer_id` is set, only messages on that customer's
    /// work orders are marked -- ids outside their orders are silently
    /// ignored rather than leaked. Returns the number of newly marked
    /// messages.
    pub async fn mark_read(
        pool: &PgPool,
        reader_role: &str,
        message_ids: &[DbId],
        owning_customer_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO message_reads (message_id, reader_role) \
             SELECT m.id, $1 \
             FROM messages m \
             JOIN work_orders w ON w.id = m.work_order_id \
             WHERE m.id = ANY($2) \
               AND ($3::bigint IS NULL OR w.customer_id = $3) \
             ON CONFLICT (message_id, reader_role) DO NOTHING",
        )
        .bind(reader_role)
        .bind(message_ids)
        .bind(owning_customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
