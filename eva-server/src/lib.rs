//! eva-server - evaluator assignment and approval console
//!
//! Long-running HTTP service that:
//! - Signs users in against the identity provider and holds their profile
//! - Serves evaluation records and the cached employee directory
//! - Saves evaluator assignments and routes batches to approvers
//! - Serves the tokenized approval page and records decisions

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod inflight;
pub mod state;
pub mod workflow;

pub use api::create_router;
pub use auth::AuthContext;
pub use config::Config;
pub use state::AppState;
