//! Router assembly and middleware stack.

pub mod health;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::handlers::{device, message, notification, work_order};
use crate::state::AppState;

/// All versioned API routes, nested under `/api/v1` by [`build_app`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/devices", device_routes())
        .nest("/work-orders", work_order_routes())
        .nest("/messages", message_routes())
        .nest("/notifications", notification_routes())
}

fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(device::register_device))
        .route("/{id}", get(device::get_device))
}

fn work_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(work_order::create_work_order).get(work_order::list_work_orders),
        )
        .route("/{id}", get(work_order::get_work_order))
        .route("/{id}/status", patch(work_order::update_status))
        .route("/{id}/events", get(work_order::list_events))
        .route(
            "/{id}/messages",
            get(message::list_messages).post(message::append_message),
        )
}

fn message_routes() -> Router<AppState> {
    Router::new().route("/mark-read", put(message::mark_messages_read))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notification::list_notifications).delete(notification::clear_all),
        )
        .route("/unread-count", get(notification::unread_count))
        .route("/read-all", put(notification::mark_all_read))
        .route("/{id}/read", put(notification::mark_notification_read))
}

/// Build the complete application router with the full middleware
/// stack applied. Shared between `main` and the integration tests.
pub fn build_app(state: AppState) -> Router {
    let timeout = TimeoutLayer::new(Duration::from_secs(state.config.request_timeout_secs));
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(timeout)
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
