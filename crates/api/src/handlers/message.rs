//! Message-thread handlers: listing, appending, and read tracking.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use repairhub_core::types::DbId;
use repairhub_core::{message, roles};
use repairhub_db::models::message::{CreateMessage, MarkMessagesRead, Message, ThreadMessage};
use repairhub_db::models::work_order::WorkOrder;
use repairhub_db::repositories::{MessageRepo, UserRepo, WorkOrderRepo};
use repairhub_events::{NotificationDispatcher, WorkOrderEvent};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the thread listing.
#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    /// Return only messages with an id greater than this cursor.
    pub since: Option<DbId>,
}

/// Fetch a work order and check the requester may see its thread.
///
/// Customers only participate in their own threads; a foreign order
/// reads as missing.
async fn load_thread_order(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> Result<WorkOrder, AppError> {
    let mut conn = state.pool.acquire().await?;
    let order = WorkOrderRepo::get(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("work order {id}")))?;

    if !auth.is_staff() && order.customer_id != auth.user_id {
        return Err(AppError::NotFound(format!("work order {id}")));
    }
    Ok(order)
}

/// `GET /api/v1/work-orders/{id}/messages`
///
/// Returns thread messages after the `since` cursor in stable
/// (created_at, id) order, with each message's read flag computed for
/// the requester's reader role.
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<DataResponse<Vec<ThreadMessage>>>, AppError> {
    load_thread_order(&state, &auth, id).await?;

    let reader_role = roles::reader_role_for(&auth.role);
    let messages =
        MessageRepo::list_since(&state.pool, id, query.since.unwrap_or(0), reader_role).await?;

    Ok(Json(DataResponse { data: messages }))
}

/// `POST /api/v1/work-orders/{id}/messages`
///
/// Appends a message to the thread and notifies the other party in the
/// same transaction. A retried request carrying the same `client_key`
/// returns the originally stored message with 200 instead of appending
/// a duplicate.
pub async fn append_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMessage>,
) -> Result<(StatusCode, Json<DataResponse<Message>>), AppError> {
    message::validate_body(&input.message)?;

    let order = load_thread_order(&state, &auth, id).await?;

    if let Some(key) = input.client_key {
        if let Some(existing) = MessageRepo::find_by_client_key(&state.pool, id, key).await? {
            tracing::debug!(
                work_order_id = id,
                message_id = existing.id,
                "Duplicate append suppressed by client key"
            );
            return Ok((StatusCode::OK, Json(DataResponse { data: existing })));
        }
    }

    let mut tx = state.pool.begin().await?;

    let sender_name = UserRepo::get_name(&mut tx, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("unknown user".into()))?;
    let sender_type = message::sender_type_for_role(&auth.role);

    let stored = MessageRepo::insert(
        &mut tx,
        id,
        sender_type,
        &sender_name,
        input.message.trim(),
        input.client_key,
    )
    .await?;

    let event = WorkOrderEvent::MessageAppended {
        work_order_id: id,
        message_id: stored.id,
        sender_type: sender_type.to_string(),
        sender_name,
        actor_user_id: Some(auth.user_id),
        actor_role: auth.role.clone(),
    };
    NotificationDispatcher::record_and_dispatch(&mut tx, &order, &event).await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}

/// `PUT /api/v1/messages/mark-read`
///
/// Adds the given message ids to the requester's reader-role read set.
/// Idempotent; customers can only mark messages on their own orders,
/// and out-of-scope ids are ignored rather than erroring.
pub async fn mark_messages_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<MarkMessagesRead>,
) -> Result<Json<DataResponse<serde_json::Value>>, AppError> {
    if input.message_ids.is_empty() {
        return Ok(Json(DataResponse {
            data: json!({ "marked_read": 0 }),
        }));
    }

    let reader_role = roles::reader_role_for(&auth.role);
    let owning_customer = (auth.role == roles::ROLE_CUSTOMER).then_some(auth.user_id);

    let marked =
        MessageRepo::mark_read(&state.pool, reader_role, &input.message_ids, owning_customer)
            .await?;

    Ok(Json(DataResponse {
        data: json!({ "marked_read": marked }),
    }))
}
