//! Repository for the `notifications` table.

use repairhub_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, event_id, recipient_id, recipient_role, kind, title, body, \
     work_order_id, is_read, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification for a recipient, returning the generated
    /// ID.
    ///
    /// At-most-once per (event, recipient): a second insert for the
    /// same pair hits `uq_notifications_event_recipient` and returns
    /// `None` instead of a duplicate row.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        conn: &mut PgConnection,
        event_id: DbId,
        recipient_id: DbId,
        recipient_role: &str,
        kind: &str,
        title: &str,
        body: &str,
        work_order_id: Option<DbId>,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications \
                 (event_id, recipient_id, recipient_role, kind, title, body, work_order_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_notifications_event_recipient DO NOTHING \
             RETURNING id",
        )
        .bind(event_id)
        .bind(recipient_id)
        .bind(recipient_role)
        .bind(kind)
        .bind(title)
        .bind(body)
        .bind(work_order_id)
        .fetch_optional(conn)
        .await
    }

    /// List a recipient's notifications after the `(since, since_id)`
    /// cursor, oldest first so clients can append in arrival order.
    ///
    /// Rows written in one transaction share a `created_at`, so a
    /// timestamp alone cannot split such a group across pages; the id
    /// tiebreaker lets a page boundary fall inside one without the
    /// next poll skipping its remainder. Without `since_id` the cursor
    /// is a strict timestamp bound.
    ///
    /// Each poll is O(unseen items) via the (recipient, created_at)
    /// index.
    pub async fn list_since(
        pool: &PgPool,
        recipient_id: DbId,
        since: Option<Timestamp>,
        since_id: Option<DbId>,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_id = $1 \
               AND ($2::timestamptz IS NULL OR (created_at, id) > ($2, $3)) \
               {filter} \
             ORDER BY created_at, id \
             LIMIT $4"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(since)
            // id::MAX reduces the row comparison to `created_at > $2`.
            .bind(since_id.unwrap_or(DbId::MAX))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification belongs to the given
    /// recipient and was updated (or had already been read), `false`
    /// if it does not exist for them.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND recipient_id = $2",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a recipient.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, recipient_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete all of a recipient's notifications (the destructive
    /// "clear all"). Returns the number of rows removed.
    pub async fn clear_all(pool: &PgPool, recipient_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(recipient_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications for a recipient.
    pub async fn unread_count(pool: &PgPool, recipient_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
