//! HTTP API of the evaluator console

pub mod admin;
pub mod approval;
pub mod auth;
pub mod dispatch;
pub mod employees;
pub mod health;
pub mod records;

use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_session;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// A list as the backend returned it, with its message when it was not a list
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub records: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<shared::RecordList<T>> for ListResponse<T> {
    fn from(list: shared::RecordList<T>) -> Self {
        Self {
            records: list.records,
            error: list.error,
        }
    }
}

/// Build the application router with all middleware and state
pub fn create_router(state: AppState) -> Router {
    // Session required; admin routes add their own guard inside
    let protected = Router::new()
        .merge(employees::router())
        .merge(records::router())
        .merge(dispatch::router())
        .merge(admin::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    // Public, or authenticated per handler through the AuthContext extractor
    let public = Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(approval::router());

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
