//! Notification feed handlers.
//!
//! The feed is strictly recipient-scoped: every query filters on the
//! authenticated user's id, so one user can never read or mutate
//! another's notifications.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use repairhub_core::types::{DbId, Timestamp};
use repairhub_db::models::notification::Notification;
use repairhub_db::repositories::NotificationRepo;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the notification feed.
const DEFAULT_LIMIT: i64 = 50;
/// Maximum page size a client may request.
const MAX_LIMIT: i64 = 100;

/// Query parameters for the notification feed.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// Return only notifications created after this instant.
    pub since: Option<Timestamp>,
    /// Id tiebreaker for `since`: resume after this notification when
    /// several share the same `created_at`.
    pub since_id: Option<DbId>,
    /// Restrict the feed to unread notifications.
    #[serde(default)]
    pub unread_only: bool,
    /// Page size (default 50, capped at 100).
    pub limit: Option<i64>,
}

/// `GET /api/v1/notifications`
///
/// Pollable feed of the requester's notifications, oldest first, so
/// clients can append pages in arrival order.
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<DataResponse<Vec<Notification>>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let notifications = NotificationRepo::list_since(
        &state.pool,
        auth.user_id,
        query.since,
        query.since_id,
        query.unread_only,
        limit,
    )
    .await?;

    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// `GET /api/v1/notifications/unread-count`
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<serde_json::Value>>, AppError> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: json!({ "unread_count": count }),
    }))
}

/// `PUT /api/v1/notifications/{id}/read`
///
/// Marks one notification as read. 204 on success, 404 when the
/// notification does not exist for this recipient.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    let updated = NotificationRepo::mark_read(&state.pool, id, auth.user_id).await?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("notification {id}")))
    }
}

/// `PUT /api/v1/notifications/read-all`
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<serde_json::Value>>, AppError> {
    let marked = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: json!({ "marked_read": marked }),
    }))
}

/// `DELETE /api/v1/notifications`
///
/// Destructive "clear all": removes every notification for the
/// requester, read or not.
pub async fn clear_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<serde_json::Value>>, AppError> {
    let cleared = NotificationRepo::clear_all(&state.pool, auth.user_id).await?;
    tracing::info!(
        recipient_id = auth.user_id,
        cleared,
        "Notifications cleared"
    );
    Ok(Json(DataResponse {
        data: json!({ "cleared": cleared }),
    }))
}
