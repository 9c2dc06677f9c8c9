//! Repository for the `work_orders` table.

use repairhub_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::work_order::{CreateWorkOrder, WorkOrder};

/// Column list for `work_orders` queries.
const COLUMNS: &str = "id, customer_id, device_id, status, priority, issue_description, \
     estimated_cost, actual_cost, technician_notes, version, created_at, completed_at";

/// Provides CRUD and transition operations for work orders.
pub struct WorkOrderRepo;

impl WorkOrderRepo {
    /// Create a work order in `pending` status for a customer.
    pub async fn create(
        pool: &PgPool,
        customer_id: DbId,
        input: &CreateWorkOrder,
        priority: &str,
    ) -> Result<WorkOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_orders (customer_id, device_id, issue_description, priority) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(customer_id)
            .bind(input.device_id)
            .bind(&input.issue_description)
            .bind(priority)
            .fetch_one(pool)
            .await
    }

    /// Fetch a work order by id.
    pub async fn get(conn: &mut PgConnection, id: DbId) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_orders WHERE id = $1");
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a customer's own work orders, newest first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<WorkOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_orders \
             WHERE customer_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// List all work orders with optional status / customer filters,
    /// newest first (staff view).
    pub async fn list_all(
        pool: &PgPool,
        status: Option<&str>,
        customer_id: Option<DbId>,
    ) -> Result<Vec<WorkOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_orders \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::bigint IS NULL OR customer_id = $2) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(status)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a status transition, conditional on the version the caller
    /// last observed.
    ///
    /// Returns `None` when no row matched `(id, expected_version)` --
    /// the caller distinguishes a missing order from a stale version by
    /// fetching the row. On success the version is bumped and any
    /// supplied notes/costs/completion timestamp are applied atomically
    /// with the status change.
    #[allow(clippy::too_many_arguments)]
    pub async fn transition(
        conn: &mut PgConnection,
        id: DbId,
        expected_version: i64,
        new_status: &str,
        technician_notes: Option<&str>,
        estimated_cost: Option<f64>,
        actual_cost: Option<f64>,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE work_orders SET \
                status           = $3, \
                technician_notes = COALESCE($4, technician_notes), \
                estimated_cost   = COALESCE($5, estimated_cost), \
                actual_cost      = COALESCE($6, actual_cost), \
                completed_at     = COALESCE($7, completed_at), \
                version          = version + 1 \
             WHERE id = $1 AND version = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(new_status)
            .bind(technician_notes)
            .bind(estimated_cost)
            .bind(actual_cost)
            .bind(completed_at)
            .fetch_optional(conn)
            .await
    }
}
