//! Sign-in session API
//!
//! The front-end exchanges the identity provider's access token for a session
//! token once; the profile fetched here is held for the session lifetime.
//! Claims are taken from the sign-in id token only after it verifies.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::UserProfile;

use crate::auth::{AuthContext, IdTokenClaims};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/session", axum::routing::post(create_session).delete(delete_session))
        .route("/api/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub access_token: String,
    /// Sign-in id token; its verified claims stand in for a failed profile
    /// fetch and fill a missing employee code
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub profile: UserProfile,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

/// Create a session from an identity provider access token
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let access_token = req.access_token.trim();
    if access_token.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "access_token is required",
        ));
    }

    let claims = verified_claims(&state, req.id_token.as_deref()).await?;

    let profile = match state.profiles.fetch_profile(access_token).await {
        Ok(mut profile) => {
            if let Some(claims) = &claims {
                claims.complete(&mut profile);
            }
            profile
        }
        Err(e) => {
            tracing::warn!(error = %e, "Profile fetch failed");
            claims
                .as_ref()
                .map(IdTokenClaims::to_profile)
                .ok_or_else(|| AppError::new(ErrorCode::ProfileUnavailable))?
        }
    };

    let is_admin = profile
        .employee_code()
        .is_some_and(|code| state.config.is_admin_code(code));
    let context = AuthContext::new(profile, is_admin, state.config.session_ttl());
    let token = state
        .jwt
        .create_token(&context.session_id, context.expires_at)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(
        session_id = %context.session_id,
        employee_code = context.employee_code().unwrap_or("-"),
        is_admin,
        "Session created"
    );

    let response = SessionResponse {
        token,
        expires_at: context.expires_at,
        profile: context.profile.clone(),
        is_admin,
    };
    state.sessions.insert(context);
    Ok(ApiResponse::success(response))
}

/// Claims of a present id token; a token that fails verification refuses sign-in
async fn verified_claims(
    state: &AppState,
    id_token: Option<&str>,
) -> AppResult<Option<IdTokenClaims>> {
    let Some(id_token) = id_token.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let Some(verifier) = &state.id_tokens else {
        tracing::debug!("Id token ignored, no verifier configured");
        return Ok(None);
    };
    Ok(Some(verifier.verify(id_token).await?))
}

/// Sign out
pub async fn delete_session(
    State(state): State<AppState>,
    context: AuthContext,
) -> AppResult<ApiResponse<()>> {
    state.sessions.remove(&context.session_id);
    tracing::info!(session_id = %context.session_id, "Session ended");
    Ok(ApiResponse::ok())
}

/// Current profile
pub async fn me(context: AuthContext) -> AppResult<ApiResponse<MeResponse>> {
    Ok(ApiResponse::success(MeResponse {
        profile: context.profile,
        is_admin: context.is_admin,
        expires_at: context.expires_at,
    }))
}
