//! Request authentication extractor.
//!
//! Handlers that declare an [`AuthUser`] parameter require a valid
//! `Authorization: Bearer <token>` header; requests without one are
//! rejected with 401 before the handler body runs.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use repairhub_core::types::DbId;

use crate::{auth::jwt, error::AppError, state::AppState};

/// The authenticated user for the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("malformed authorization header".into()))?;

        let claims = jwt::validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

impl AuthUser {
    /// True for technician and admin roles.
    pub fn is_staff(&self) -> bool {
        repairhub_core::roles::is_staff(&self.role)
    }
}
