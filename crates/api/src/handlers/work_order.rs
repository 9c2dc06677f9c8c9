//! Work-order lifecycle handlers.
//!
//! Status transitions run inside a single transaction together with
//! the domain event and its notifications, so either all of them
//! commit or none do.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use repairhub_core::types::DbId;
use repairhub_core::{message, roles, work_order};
use repairhub_db::models::event::Event;
use repairhub_db::models::work_order::{CreateWorkOrder, UpdateStatus, WorkOrder, WorkOrderFilter};
use repairhub_db::repositories::{DeviceRepo, EventRepo, MessageRepo, UserRepo, WorkOrderRepo};
use repairhub_events::{NotificationDispatcher, WorkOrderEvent};

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `POST /api/v1/work-orders`
///
/// Customers submit a repair request for one of their registered
/// devices. Orders always start in `pending` with a default priority
/// of `medium`.
pub async fn create_work_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateWorkOrder>,
) -> Result<(StatusCode, Json<DataResponse<WorkOrder>>), AppError> {
    if auth.role != roles::ROLE_CUSTOMER {
        return Err(AppError::Forbidden(
            "Only customers may submit repair requests".into(),
        ));
    }

    work_order::validate_issue_description(&input.issue_description)?;

    let priority = match input.priority.as_deref() {
        Some(p) => {
            work_order::validate_priority(p)?;
            p
        }
        None => work_order::PRIORITY_MEDIUM,
    };

    // The device must exist and belong to the requester. A foreign
    // device reads as missing rather than revealing it exists.
    let device = DeviceRepo::get(&state.pool, input.device_id)
        .await?
        .filter(|d| d.customer_id == auth.user_id)
        .ok_or_else(|| AppError::NotFound(format!("device {}", input.device_id)))?;

    let order = WorkOrderRepo::create(&state.pool, auth.user_id, &input, priority).await?;

    tracing::info!(
        work_order_id = order.id,
        customer_id = auth.user_id,
        device_id = device.id,
        "Work order created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// `GET /api/v1/work-orders`
///
/// Staff see every order and may filter by status or customer;
/// customers see only their own orders and the filters are ignored.
pub async fn list_work_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<WorkOrderFilter>,
) -> Result<Json<DataResponse<Vec<WorkOrder>>>, AppError> {
    let orders = if auth.is_staff() {
        if let Some(status) = filter.status.as_deref() {
            work_order::validate_status(status)?;
        }
        WorkOrderRepo::list_all(&state.pool, filter.status.as_deref(), filter.customer_id).await?
    } else {
        WorkOrderRepo::list_for_customer(&state.pool, auth.user_id).await?
    };

    Ok(Json(DataResponse { data: orders }))
}

/// `GET /api/v1/work-orders/{id}`
pub async fn get_work_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<DataResponse<WorkOrder>>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let order = WorkOrderRepo::get(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("work order {id}")))?;

    if !auth.is_staff() && order.customer_id != auth.user_id {
        // Customers cannot learn that someone else's order exists.
        return Err(AppError::NotFound(format!("work order {id}")));
    }

    Ok(Json(DataResponse { data: order }))
}

/// `GET /api/v1/work-orders/{id}/events`
///
/// The order's audit trail. Staff only.
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<DataResponse<Vec<Event>>>, AppError> {
    if !auth.is_staff() {
        return Err(AppError::Forbidden(
            "Only staff may view the event log".into(),
        ));
    }

    let mut conn = state.pool.acquire().await?;
    WorkOrderRepo::get(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("work order {id}")))?;

    let events = EventRepo::list_for_work_order(&state.pool, id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// `PATCH /api/v1/work-orders/{id}/status`
///
/// Applies a status transition conditional on the version the caller
/// last observed. The update, the domain event, its notifications, and
/// any technician-note system message all commit in one transaction.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatus>,
) -> Result<Json<DataResponse<WorkOrder>>, AppError> {
    work_order::validate_status(&input.status)?;

    let mut tx = state.pool.begin().await?;

    let order = WorkOrderRepo::get(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("work order {id}")))?;

    let is_owner = order.customer_id == auth.user_id;
    if auth.role == roles::ROLE_CUSTOMER && !is_owner {
        return Err(AppError::NotFound(format!("work order {id}")));
    }

    work_order::authorize_transition(&auth.role, is_owner, &order.status, &input.status)?;
    work_order::validate_transition(&order.status, &input.status)?;

    // Notes and costs are shop-side fields; customer requests cannot
    // set them even on their own cancellation.
    let technician_notes = if auth.is_staff() {
        input
            .technician_notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
    } else {
        None
    };
    let (estimated_cost, actual_cost) = if auth.is_staff() {
        (input.estimated_cost, input.actual_cost)
    } else {
        (None, None)
    };

    let completed_at = (input.status == work_order::STATUS_COMPLETED).then(chrono::Utc::now);

    let updated = WorkOrderRepo::transition(
        &mut tx,
        id,
        input.version,
        &input.status,
        technician_notes,
        estimated_cost,
        actual_cost,
        completed_at,
    )
    .await?
    .ok_or_else(|| AppError::StaleVersion(format!("work order {id}")))?;

    let event = WorkOrderEvent::StatusChanged {
        work_order_id: id,
        old_status: order.status.clone(),
        new_status: updated.status.clone(),
        actor_user_id: auth.user_id,
        actor_role: auth.role.clone(),
    };
    NotificationDispatcher::record_and_dispatch(&mut tx, &updated, &event).await?;

    // A note recorded alongside the transition also lands in the
    // thread as a system message so the customer sees it in context.
    if let Some(note) = technician_notes {
        let sender_name = UserRepo::get_name(&mut tx, auth.user_id)
            .await?
            .unwrap_or_else(|| "Repair shop".to_string());

        let note_message = MessageRepo::insert(
            &mut tx,
            id,
            message::SENDER_SYSTEM,
            &sender_name,
            note,
            None,
        )
        .await?;

        let note_event = WorkOrderEvent::MessageAppended {
            work_order_id: id,
            message_id: note_message.id,
            sender_type: message::SENDER_SYSTEM.to_string(),
            sender_name,
            actor_user_id: Some(auth.user_id),
            actor_role: auth.role.clone(),
        };
        NotificationDispatcher::record_and_dispatch(&mut tx, &updated, &note_event).await?;
    }

    tx.commit().await?;

    tracing::info!(
        work_order_id = id,
        old_status = %order.status,
        new_status = %updated.status,
        version = updated.version,
        "Work order transitioned"
    );

    Ok(Json(DataResponse { data: updated }))
}
