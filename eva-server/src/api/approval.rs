//! Approval link API
//!
//! Reached from the link in the approver's message. The token in the path is
//! the only credential.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::Decision;

use crate::state::AppState;
use crate::workflow::responder::{self, ApprovalView};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/approval/{token}", get(view))
        .route("/api/approval/{token}/decision", post(decide))
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// 1 = accept, 2 = reject
    pub decision: u8,
    /// Approver answered yes to the confirmation prompt
    #[serde(default)]
    pub confirmed: bool,
}

fn require_token(token: &str) -> AppResult<&str> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::new(ErrorCode::LinkTokenMissing));
    }
    Ok(token)
}

/// Batch and status of one link
pub async fn view(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<ApiResponse<ApprovalView>> {
    let token = require_token(&token)?;
    Ok(ApiResponse::success(responder::load(&state.api, token).await))
}

/// Record the approver's decision
pub async fn decide(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> AppResult<ApiResponse<ApprovalView>> {
    let token = require_token(&token)?;
    let decision = Decision::try_from(req.decision).map_err(|value| {
        AppError::with_message(
            ErrorCode::InvalidDecision,
            format!("decision must be 1 or 2, got {value}"),
        )
    })?;

    let _guard = state
        .inflight
        .try_acquire(format!("decision:{token}"))
        .ok_or_else(|| AppError::in_progress("decision"))?;

    let view = responder::decide(&state.api, token, decision, req.confirmed).await?;
    let message = view.notice.clone().unwrap_or_else(|| decision.success_message());
    Ok(ApiResponse::success_with_message(message, view))
}
