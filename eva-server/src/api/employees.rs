//! Employee directory API

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use shared::error::{ApiResponse, AppResult};
use shared::models::Employee;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/employees", get(list))
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    /// Case-insensitive filter on code or label
    #[serde(default)]
    pub q: Option<String>,
}

/// Directory entries, optionally filtered
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> AppResult<ApiResponse<Vec<Employee>>> {
    let employees = state.directory().await?;
    let employees = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => employees.into_iter().filter(|e| e.matches(q)).collect(),
        _ => employees,
    };
    Ok(ApiResponse::success(employees))
}
