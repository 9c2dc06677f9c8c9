//! API error type and HTTP response mapping.
//!
//! Every handler returns `Result<_, AppError>`; the [`IntoResponse`]
//! impl maps each variant to a status code and a JSON body of the
//! shape `{ "error": "...", "code": "..." }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repairhub_core::error::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    IllegalTransition(String),

    #[error("{0} was modified by another request")]
    StaleVersion(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::IllegalTransition(_) => (StatusCode::FORBIDDEN, "ILLEGAL_TRANSITION"),
            AppError::StaleVersion(_) => (StatusCode::CONFLICT, "STALE_VERSION"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Database(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Unique-constraint violations surface as conflicts rather than 500s.
        if let AppError::Database(ref err) = self {
            if let Some(conflict) = classify_sqlx_error(err) {
                let body = json!({ "error": conflict, "code": "CONFLICT" });
                return (StatusCode::CONFLICT, Json(body)).into_response();
            }
        }

        let (status, code) = self.status_and_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal server error");
            // Do not leak internals to clients.
            let body = json!({ "error": "internal server error", "code": code });
            return (status, Json(body)).into_response();
        }

        let body = json!({ "error": self.to_string(), "code": code });
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => AppError::NotFound(format!("{entity} {id}")),
            CoreError::Validation(msg) => AppError::Validation(msg),
            CoreError::IllegalTransition(msg) => AppError::IllegalTransition(msg),
            CoreError::StaleVersion { entity, id } => {
                AppError::StaleVersion(format!("{entity} {id}"))
            }
            CoreError::Conflict(msg) => AppError::Conflict(msg),
            CoreError::Unauthorized(msg) => AppError::Unauthorized(msg),
            CoreError::Forbidden(msg) => AppError::Forbidden(msg),
            CoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Inspect a sqlx error for a unique-constraint violation and produce a
/// user-facing conflict message. Constraint names follow the `uq_` prefix
/// convention from the migrations.
fn classify_sqlx_error(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    let constraint = db_err.constraint()?;
    if !constraint.starts_with("uq_") {
        return None;
    }
    let field = constraint.trim_start_matches("uq_").replace('_', " ");
    Some(format!("duplicate value for {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn core_error_maps_to_matching_variant() {
        let err: AppError = CoreError::NotFound {
            entity: "work order",
            id: 7,
        }
        .into();
        assert_matches!(err, AppError::NotFound(_));
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);

        let err: AppError = CoreError::IllegalTransition("completed -> pending".into()).into();
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "ILLEGAL_TRANSITION");

        let err: AppError = CoreError::StaleVersion {
            entity: "work order",
            id: 3,
        }
        .into();
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "STALE_VERSION");
    }

    #[test]
    fn validation_maps_to_400() {
        let err: AppError = CoreError::Validation("message must not be empty".into()).into();
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
    }
}
