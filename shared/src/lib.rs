//! Shared types for the evaluator-assignment workspace
//!
//! Wire models of the external record store, response-envelope parsing,
//! and the error/response types used by the HTTP surface.

pub mod envelope;
pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use envelope::{RecordList, TokenLookup, extract_link_token, normalize_list};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
