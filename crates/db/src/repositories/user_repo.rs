//! Repository for the `users` table.

use repairhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, name, email, role, is_active, created_at";

/// Provides read/write operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Provision a user, returning the stored row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Fetch a user by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a user's display name, if the user exists.
    pub async fn get_name(conn: &mut PgConnection, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List `(id, role)` for every active staff user (technician or admin).
    ///
    /// Used by the dispatcher to fan out customer-originated events to
    /// the shop.
    pub async fn active_staff(
        conn: &mut PgConnection,
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, role FROM users \
             WHERE role IN ('technician', 'admin') AND is_active = true \
             ORDER BY id",
        )
        .fetch_all(conn)
        .await
    }
}
