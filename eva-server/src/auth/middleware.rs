//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::auth::{AuthContext, authenticate};
use crate::state::AppState;

/// Requires a live session and injects [`AuthContext`] into the request extensions
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let context = authenticate(&state, header)?;

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

/// Requires the session to belong to an allow-listed admin
///
/// Must run after [`require_session`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let context = req
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(AppError::not_authenticated)?;

    if !context.is_admin {
        tracing::warn!(
            session_id = %context.session_id,
            employee_code = context.employee_code().unwrap_or("-"),
            "Admin route refused"
        );
        return Err(AppError::admin_required());
    }

    Ok(next.run(req).await)
}
