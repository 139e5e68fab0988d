//! Session extractor
//!
//! Handlers take [`AuthContext`] as an argument to require a live session.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::{AuthContext, JwtError, JwtService};
use crate::state::AppState;

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already resolved by `require_session`
        if let Some(context) = parts.extensions.get::<AuthContext>() {
            return Ok(context.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let context = authenticate(state, header)?;

        parts.extensions.insert(context.clone());
        Ok(context)
    }
}

/// Resolves an `Authorization` header value to a live session
pub fn authenticate(state: &AppState, header: Option<&str>) -> Result<AuthContext, AppError> {
    let Some(header) = header else {
        tracing::debug!("Missing Authorization header");
        return Err(AppError::not_authenticated());
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Session token rejected");
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    state
        .sessions
        .get(&claims.sub)
        .ok_or_else(AppError::session_expired)
}
