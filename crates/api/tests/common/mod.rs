//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use repairhub_api::auth::jwt::{generate_access_token, JwtConfig};
use repairhub_api::config::ServerConfig;
use repairhub_api::routes::build_app;
use repairhub_api::state::AppState;
use repairhub_core::types::DbId;
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".into()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.into(),
            access_token_expiry_mins: 15,
        },
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).expect("token generation")
}

/// Send a request through the router; `token` adds a Bearer header,
/// `body` is serialized as JSON.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request build"),
        None => builder.body(Body::empty()).expect("request build"),
    };
    app.clone().oneshot(request).await.expect("request send")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Assert the response is an error with the given status and `code`
/// field, returning the parsed body.
pub async fn assert_error(
    response: Response<Body>,
    status: StatusCode,
    code: &str,
) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let body = body_json(response).await;
    assert_eq!(body["code"], code, "unexpected error body: {body}");
    body
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, name: &str, email: &str, role: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_one(pool)
        .await
        .expect("seed user")
}

pub async fn seed_device(pool: &PgPool, customer_id: DbId) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO devices (customer_id, device_type, brand, model) \
         VALUES ($1, 'phone', 'Acme', 'X1') RETURNING id",
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await
    .expect("seed device")
}

pub async fn seed_order(pool: &PgPool, customer_id: DbId, device_id: DbId, status: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO work_orders (customer_id, device_id, status, issue_description) \
         VALUES ($1, $2, $3, 'Cracked screen') RETURNING id",
    )
    .bind(customer_id)
    .bind(device_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("seed work order")
}
