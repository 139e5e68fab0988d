//! Admin API
//!
//! Allow-listed admins may read the admin roster and any admin's records.

use axum::{
    Router,
    extract::{Path, State},
    middleware,
    routing::get,
};

use shared::error::{ApiResponse, AppResult};
use shared::models::AdminOption;

use super::ListResponse;
use super::records::{RecordsResponse, load_records};
use crate::auth::require_admin;
use crate::error::upstream_error;
use crate::state::AppState;

const ADMINS_FALLBACK_MESSAGE: &str = "Failed to fetch admin data";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/admins", get(list_admins))
        .route("/api/admin/records/{admin_code}", get(records_of))
        .route_layer(middleware::from_fn(require_admin))
}

/// Admin roster
pub async fn list_admins(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ListResponse<AdminOption>>> {
    let list = state
        .api
        .list_admins()
        .await
        .map_err(|e| upstream_error(e, ADMINS_FALLBACK_MESSAGE))?;
    Ok(ApiResponse::success(list.into()))
}

/// Records of any admin
pub async fn records_of(
    State(state): State<AppState>,
    Path(admin_code): Path<String>,
) -> AppResult<ApiResponse<RecordsResponse>> {
    Ok(ApiResponse::success(load_records(&state, admin_code.trim()).await?))
}
