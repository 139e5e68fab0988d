//! Mapping of remote failures into [`AppError`]

use eva_client::ClientError;
use shared::error::{AppError, ErrorCode};

/// Error code for a failed remote call; transport failures keep their own codes
pub fn remote_failure_code(err: &ClientError, fallback: ErrorCode) -> ErrorCode {
    if err.is_timeout() {
        ErrorCode::TimeoutError
    } else if err.is_transport() {
        ErrorCode::NetworkError
    } else {
        fallback
    }
}

/// Read-path failure of a remote collaborator
pub fn upstream_error(err: ClientError, fallback_message: &str) -> AppError {
    tracing::warn!(error = %err, "Upstream call failed");
    let code = match &err {
        ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
            ErrorCode::InvalidUpstreamResponse
        }
        ClientError::NotConfigured(_) => ErrorCode::ConfigError,
        other => remote_failure_code(other, ErrorCode::UpstreamError),
    };
    let message = err.remote_message().unwrap_or(fallback_message).to_string();
    AppError::with_message(code, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_kept() {
        let err = upstream_error(
            ClientError::Backend {
                status: 500,
                message: "db down".into(),
            },
            "Failed to fetch employees",
        );
        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert_eq!(err.message, "db down");
    }

    #[test]
    fn test_shape_failure_uses_fallback() {
        let err = upstream_error(
            ClientError::InvalidResponse("bad rows".into()),
            "Failed to fetch employees",
        );
        assert_eq!(err.code, ErrorCode::InvalidUpstreamResponse);
        assert_eq!(err.message, "Failed to fetch employees");
    }
}
