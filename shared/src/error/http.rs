//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound => StatusCode::NOT_FOUND,

            Self::OperationInProgress => StatusCode::CONFLICT,

            // 428: the caller has to confirm before the request can proceed
            Self::DecisionNotConfirmed => StatusCode::PRECONDITION_REQUIRED,

            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::SessionExpired
            | Self::ProfileUnavailable => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // Remote collaborators failed or answered with something unusable
            Self::UpstreamError
            | Self::InvalidUpstreamResponse
            | Self::LinkTokenMissing
            | Self::SaveFailed
            | Self::ApprovalRequestFailed
            | Self::NotificationFailed
            | Self::DecisionFailed => StatusCode::BAD_GATEWAY,

            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError | Self::ConfigError | Self::Unknown => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation and malformed input)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_auth_and_permission_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::SessionExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_workflow_status() {
        assert_eq!(
            ErrorCode::ApproverRequired.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidDecision.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::DecisionNotConfirmed.http_status(),
            StatusCode::PRECONDITION_REQUIRED
        );
        assert_eq!(
            ErrorCode::OperationInProgress.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::LinkTokenMissing.http_status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::NetworkError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
