//! Evaluation record API

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};

use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{EvaluationRecord, group_key_of};

use crate::auth::AuthContext;
use crate::error::upstream_error;
use crate::state::AppState;
use crate::workflow::editor::{self, EvaluatorAssignment, SAVE_SUCCESS_MESSAGE};

const RECORDS_FALLBACK_MESSAGE: &str = "Failed to fetch records";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/records", get(list))
        .route("/api/records/{id}/evaluators", put(save_evaluators))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    #[serde(default)]
    pub owner: Option<String>,
}

/// Records of one owner and the grouping key of the batch
#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<EvaluationRecord>,
    pub group_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Loads the records owned by `owner_code`
pub async fn load_records(state: &AppState, owner_code: &str) -> AppResult<RecordsResponse> {
    let list = state
        .api
        .list_records(owner_code)
        .await
        .map_err(|e| upstream_error(e, RECORDS_FALLBACK_MESSAGE))?;

    Ok(RecordsResponse {
        group_key: group_key_of(&list.records),
        records: list.records,
        error: list.error,
    })
}

/// Owner whose records the caller may read
fn resolve_owner(context: &AuthContext, requested: Option<&str>) -> AppResult<String> {
    let requested = requested.map(str::trim).filter(|o| !o.is_empty());
    match (context.employee_code(), requested) {
        (Some(own), None) => Ok(own.to_string()),
        (Some(own), Some(other)) if own == other => Ok(own.to_string()),
        (Some(_), Some(_)) => Err(AppError::with_message(
            ErrorCode::PermissionDenied,
            "owner can only be chosen when the profile has no employee code",
        )),
        (None, Some(owner)) => Ok(owner.to_string()),
        (None, None) => Err(AppError::new(ErrorCode::OwnerRequired)),
    }
}

/// Records of the caller
pub async fn list(
    State(state): State<AppState>,
    context: AuthContext,
    Query(query): Query<RecordsQuery>,
) -> AppResult<ApiResponse<RecordsResponse>> {
    let owner = resolve_owner(&context, query.owner.as_deref())?;
    Ok(ApiResponse::success(load_records(&state, &owner).await?))
}

/// Persist one record's evaluator slots
pub async fn save_evaluators(
    State(state): State<AppState>,
    context: AuthContext,
    Path(id): Path<i64>,
    Json(assignment): Json<EvaluatorAssignment>,
) -> AppResult<ApiResponse<()>> {
    let admin_code = context
        .employee_code()
        .ok_or_else(|| AppError::new(ErrorCode::OwnerRequired))?;

    let _guard = state
        .inflight
        .try_acquire(format!("save:{}:{id}", context.actor()))
        .ok_or_else(|| AppError::in_progress("save"))?;

    editor::save_evaluators(&state.api, id, assignment, admin_code).await?;
    Ok(ApiResponse {
        message: SAVE_SUCCESS_MESSAGE.to_string(),
        ..ApiResponse::ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::models::UserProfile;

    fn context(code: Option<&str>) -> AuthContext {
        AuthContext::new(
            UserProfile {
                employee_id: code.map(str::to_string),
                ..Default::default()
            },
            false,
            Duration::hours(1),
        )
    }

    #[test]
    fn test_own_code_is_used() {
        assert_eq!(resolve_owner(&context(Some("480011")), None).unwrap(), "480011");
        assert_eq!(
            resolve_owner(&context(Some("480011")), Some("480011")).unwrap(),
            "480011"
        );
    }

    #[test]
    fn test_owner_only_without_code() {
        assert_eq!(resolve_owner(&context(None), Some(" 12 ")).unwrap(), "12");
        assert_eq!(
            resolve_owner(&context(Some("480011")), Some("12")).unwrap_err().code,
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            resolve_owner(&context(None), None).unwrap_err().code,
            ErrorCode::OwnerRequired
        );
    }
}
