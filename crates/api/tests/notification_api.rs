//! Notification feed integration tests.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

/// Drive a status change so the customer has one notification.
async fn transition(
    app: &axum::Router,
    order: i64,
    tech: i64,
    status: &str,
    version: i64,
) {
    let token = common::token_for(tech, "technician");
    let response = common::request(
        app,
        Method::PATCH,
        &format!("/api/v1/work-orders/{order}/status"),
        Some(&token),
        Some(json!({ "status": status, "version": version })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "transition to {status}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_is_scoped_to_the_recipient(pool: PgPool) {
    let ana = common::seed_user(&pool, "Ana", "ana@example.com", "customer").await;
    let bob = common::seed_user(&pool, "Bob", "bob@example.com", "customer").await;
    let device = common::seed_device(&pool, ana).await;
    let order = common::seed_order(&pool, ana, device, "pending").await;
    let tech = common::seed_user(&pool, "Tess", "tess@example.com", "technician").await;
    let app = common::build_test_app(pool);

    transition(&app, order, tech, "in_progress", 1).await;

    let token = common::token_for(ana, "customer");
    let response =
        common::request(&app, Method::GET, "/api/v1/notifications", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["kind"], "status_change");
    assert_eq!(feed[0]["recipient_id"], ana);
    assert_eq!(feed[0]["work_order_id"], order);
    assert_eq!(feed[0]["is_read"], false);

    // Another customer's feed stays empty.
    let token = common::token_for(bob, "customer");
    let response =
        common::request(&app, Method::GET, "/api/v1/notifications", Some(&token), None).await;
    let body = common::body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unread_count_and_mark_read(pool: PgPool) {
    let ana = common::seed_user(&pool, "Ana", "ana@example.com", "customer").await;
    let device = common::seed_device(&pool, ana).await;
    let order = common::seed_order(&pool, ana, device, "pending").await;
    let tech = common::seed_user(&pool, "Tess", "tess@example.com", "technician").await;
    let app = common::build_test_app(pool);

    transition(&app, order, tech, "in_progress", 1).await;
    transition(&app, order, tech, "waiting_for_parts", 2).await;

    let token = common::token_for(ana, "customer");
    let response = common::request(
        &app,
        Method::GET,
        "/api/v1/notifications/unread-count",
        Some(&token),
        None,
    )
    .await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["unread_count"], 2);

    // Read the first one.
    let response =
        common::request(&app, Method::GET, "/api/v1/notifications", Some(&token), None).await;
    let body = common::body_json(response).await;
    let first_id = body["data"][0]["id"].as_i64().unwrap();

    let response = common::request(
        &app,
        Method::PUT,
        &format!("/api/v1/notifications/{first_id}/read"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = common::request(
        &app,
        Method::GET,
        "/api/v1/notifications/unread-count",
        Some(&token),
        None,
    )
    .await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["unread_count"], 1);

    // Unread-only filter skips the read one.
    let response = common::request(
        &app,
        Method::GET,
        "/api/v1/notifications?unread_only=true",
        Some(&token),
        None,
    )
    .await;
    let body = common::body_json(response).await;
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_ne!(feed[0]["id"].as_i64().unwrap(), first_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_read_rejects_foreign_notifications(pool: PgPool) {
    let ana = common::seed_user(&pool, "Ana", "ana@example.com", "customer").await;
    let bob = common::seed_user(&pool, "Bob", "bob@example.com", "customer").await;
    let device = common::seed_device(&pool, ana).await;
    let order = common::seed_order(&pool, ana, device, "pending").await;
    let tech = common::seed_user(&pool, "Tess", "tess@example.com", "technician").await;
    let app = common::build_test_app(pool);

    transition(&app, order, tech, "in_progress", 1).await;

    let token = common::token_for(ana, "customer");
    let response =
        common::request(&app, Method::GET, "/api/v1/notifications", Some(&token), None).await;
    let body = common::body_json(response).await;
    let notification_id = body["data"][0]["id"].as_i64().unwrap();

    // Bob cannot read Ana's notification; it reads as missing.
    let token = common::token_for(bob, "customer");
    let response = common::request(
        &app,
        Method::PUT,
        &format!("/api/v1/notifications/{notification_id}/read"),
        Some(&token),
        None,
    )
    .await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    // And a nonexistent id is a plain 404.
    let response = common::request(
        &app,
        Method::PUT,
        "/api/v1/notifications/999999/read",
        Some(&token),
        None,
    )
    .await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn read_all_then_clear_all(pool: PgPool) {
    let ana = common::seed_user(&pool, "Ana", "ana@example.com", "customer").await;
    let device = common::seed_device(&pool, ana).await;
    let order = common::seed_order(&pool, ana, device, "pending").await;
    let tech = common::seed_user(&pool, "Tess", "tess@example.com", "technician").await;
    let app = common::build_test_app(pool.clone());

    transition(&app, order, tech, "in_progress", 1).await;
    transition(&app, order, tech, "completed", 2).await;

    let token = common::token_for(ana, "customer");
    let response = common::request(
        &app,
        Method::PUT,
        "/api/v1/notifications/read-all",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["marked_read"], 2);

    let response = common::request(
        &app,
        Method::GET,
        "/api/v1/notifications/unread-count",
        Some(&token),
        None,
    )
    .await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["unread_count"], 0);

    let response = common::request(
        &app,
        Method::DELETE,
        "/api/v1/notifications",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["cleared"], 2);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_id = $1")
            .bind(ana)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn since_cursor_returns_only_newer_notifications(pool: PgPool) {
    let ana = common::seed_user(&pool, "Ana", "ana@example.com", "customer").await;
    let device = common::seed_device(&pool, ana).await;
    let order = common::seed_order(&pool, ana, device, "pending").await;
    let tech = common::seed_user(&pool, "Tess", "tess@example.com", "technician").await;
    let app = common::build_test_app(pool);

    transition(&app, order, tech, "in_progress", 1).await;

    let token = common::token_for(ana, "customer");
    let response =
        common::request(&app, Method::GET, "/api/v1/notifications", Some(&token), None).await;
    let body = common::body_json(response).await;
    let first_created_at = body["data"][0]["created_at"].as_str().unwrap().to_string();

    transition(&app, order, tech, "waiting_for_parts", 2).await;

    // Polling with the last seen timestamp yields only the new item.
    let uri = format!(
        "/api/v1/notifications?since={}",
        urlencode(&first_created_at)
    );
    let response = common::request(&app, Method::GET, &uri, Some(&token), None).await;
    let body = common::body_json(response).await;
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["kind"], "status_change");
    assert!(feed[0]["body"].as_str().unwrap().contains("Waiting For Parts"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn id_tiebreaker_pages_through_same_instant_notifications(pool: PgPool) {
    let ana = common::seed_user(&pool, "Ana", "ana@example.com", "customer").await;
    let device = common::seed_device(&pool, ana).await;
    let order = common::seed_order(&pool, ana, device, "pending").await;
    let tech = common::seed_user(&pool, "Tess", "tess@example.com", "technician").await;
    let app = common::build_test_app(pool);

    // A transition carrying a note writes two notifications for the
    // customer in one transaction, so both rows share a created_at.
    let token = common::token_for(tech, "technician");
    let response = common::request(
        &app,
        Method::PATCH,
        &format!("/api/v1/work-orders/{order}/status"),
        Some(&token),
        Some(json!({
            "status": "in_progress",
            "version": 1,
            "technician_notes": "Ordered a new battery."
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = common::token_for(ana, "customer");
    let response = common::request(
        &app,
        Method::GET,
        "/api/v1/notifications?limit=1",
        Some(&token),
        None,
    )
    .await;
    let body = common::body_json(response).await;
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    let first_id = feed[0]["id"].as_i64().unwrap();
    let first_created_at = feed[0]["created_at"].as_str().unwrap().to_string();

    // Resuming from (created_at, id) picks up the rest of the group.
    let uri = format!(
        "/api/v1/notifications?since={}&since_id={first_id}",
        urlencode(&first_created_at)
    );
    let response = common::request(&app, Method::GET, &uri, Some(&token), None).await;
    let body = common::body_json(response).await;
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0]["id"].as_i64().unwrap() > first_id);
    assert_eq!(feed[0]["created_at"].as_str().unwrap(), first_created_at);

    // And nothing follows the second page.
    let second_id = feed[0]["id"].as_i64().unwrap();
    let uri = format!(
        "/api/v1/notifications?since={}&since_id={second_id}",
        urlencode(&first_created_at)
    );
    let response = common::request(&app, Method::GET, &uri, Some(&token), None).await;
    let body = common::body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

/// Minimal percent-encoding for timestamp query values ('+' and ':').
fn urlencode(value: &str) -> String {
    value.replace('+', "%2B").replace(':', "%3A")
}
