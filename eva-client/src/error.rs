//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request could not be sent or the body could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status; message is the body's `message` or a status fallback
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// 2xx response carrying an explicit `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client was built without a required setting
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Message from the remote side, when it supplied one
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Backend { message, .. } | Self::Rejected(message) => Some(message),
            _ => None,
        }
    }

    /// True for failures before any response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
