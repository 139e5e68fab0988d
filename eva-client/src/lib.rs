//! Eva Client - remote collaborators of the evaluator console
//!
//! - [`HttpBackend`]: the external record store
//! - [`HttpGateway`]: the staff messaging gateway
//! - [`GraphClient`]: the identity provider's profile endpoint
//! - [`HttpKeySet`]: the identity provider's id token signing keys
//! - [`EvaApi`]: typed facade over a [`Backend`] that applies envelope
//!   normalization once for every list call

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod graph;
pub mod keys;

pub use api::EvaApi;
pub use backend::{Backend, Endpoint, HttpBackend};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{GatewayMessage, HttpGateway, Notifier};
pub use graph::{GraphClient, ProfileSource};
pub use keys::{HttpKeySet, KeySetSource};

// Re-export shared types for convenience
pub use shared::envelope::{RecordList, TokenLookup};
