//! Approval dispatch API

use axum::{Json, Router, extract::State, routing::post};

use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::auth::AuthContext;
use crate::state::AppState;
use crate::workflow::dispatcher::{self, ApprovalDispatch, DISPATCH_SUCCESS_MESSAGE, DispatchOutcome};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/approvals", post(dispatch))
}

/// Route the caller's batch to an approver
pub async fn dispatch(
    State(state): State<AppState>,
    context: AuthContext,
    Json(request): Json<ApprovalDispatch>,
) -> AppResult<ApiResponse<DispatchOutcome>> {
    let admin_id = context
        .employee_code()
        .ok_or_else(|| AppError::new(ErrorCode::OwnerRequired))?;

    let _guard = state
        .inflight
        .try_acquire(format!("dispatch:{}:{}", context.actor(), request.group_key))
        .ok_or_else(|| AppError::in_progress("dispatch"))?;

    let outcome = dispatcher::dispatch(
        &state.api,
        state.notifier.as_ref(),
        &state.config.public_origin,
        admin_id,
        request,
    )
    .await?;

    Ok(ApiResponse::success_with_message(DISPATCH_SUCCESS_MESSAGE, outcome))
}
