//! Unified error codes for the evaluator console
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Evaluation workflow errors
//! - 9xxx: System and upstream errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes travel as plain `u16` values so the front-end can switch on them
/// without knowing the Rust variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired or was signed out
    SessionExpired = 1005,
    /// Identity provider did not return a usable profile
    ProfileUnavailable = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin allow-list membership required
    AdminRequired = 2003,

    // ==================== 4xxx: Evaluation workflow ====================
    /// No approver was chosen
    ApproverRequired = 4001,
    /// Approval request created but no link token found in the response
    LinkTokenMissing = 4002,
    /// Decision was submitted without confirmation
    DecisionNotConfirmed = 4003,
    /// Decision value is neither accept nor reject
    InvalidDecision = 4004,
    /// The same action is already running for this actor
    OperationInProgress = 4005,
    /// Saving evaluator assignment failed
    SaveFailed = 4006,
    /// Creating the approval request failed
    ApprovalRequestFailed = 4007,
    /// Sending the approver notification failed
    NotificationFailed = 4008,
    /// Recording the approval decision failed
    DecisionFailed = 4009,
    /// Owner employee code could not be determined
    OwnerRequired = 4010,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Upstream service answered with an explicit failure
    UpstreamError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Upstream response did not have the expected shape
    InvalidUpstreamResponse = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::ProfileUnavailable => "User profile is unavailable",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator access is required",

            // Evaluation workflow
            ErrorCode::ApproverRequired => "An approver must be selected",
            ErrorCode::LinkTokenMissing => "Approval link code was not returned",
            ErrorCode::DecisionNotConfirmed => "Decision must be confirmed",
            ErrorCode::InvalidDecision => "Decision must be 1 (approve) or 2 (reject)",
            ErrorCode::OperationInProgress => "The same operation is already in progress",
            ErrorCode::SaveFailed => "Failed to save evaluation data",
            ErrorCode::ApprovalRequestFailed => "Failed to update approval",
            ErrorCode::NotificationFailed => "Failed to send message",
            ErrorCode::DecisionFailed => "Failed to send approval",
            ErrorCode::OwnerRequired => "Employee code is required",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::UpstreamError => "Upstream service error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::InvalidUpstreamResponse => "Unexpected upstream response",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown numeric value into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1008 => Ok(ErrorCode::ProfileUnavailable),

            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            4001 => Ok(ErrorCode::ApproverRequired),
            4002 => Ok(ErrorCode::LinkTokenMissing),
            4003 => Ok(ErrorCode::DecisionNotConfirmed),
            4004 => Ok(ErrorCode::InvalidDecision),
            4005 => Ok(ErrorCode::OperationInProgress),
            4006 => Ok(ErrorCode::SaveFailed),
            4007 => Ok(ErrorCode::ApprovalRequestFailed),
            4008 => Ok(ErrorCode::NotificationFailed),
            4009 => Ok(ErrorCode::DecisionFailed),
            4010 => Ok(ErrorCode::OwnerRequired),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::UpstreamError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::InvalidUpstreamResponse),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::SessionExpired.code(), 1005);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::ApproverRequired.code(), 4001);
        assert_eq!(ErrorCode::LinkTokenMissing.code(), 4002);
        assert_eq!(ErrorCode::OperationInProgress.code(), 4005);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::InvalidUpstreamResponse.code(), 9006);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::InvalidRequest,
            ErrorCode::RequiredField,
            ErrorCode::NotAuthenticated,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::SessionExpired,
            ErrorCode::ProfileUnavailable,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::ApproverRequired,
            ErrorCode::LinkTokenMissing,
            ErrorCode::DecisionNotConfirmed,
            ErrorCode::InvalidDecision,
            ErrorCode::OperationInProgress,
            ErrorCode::SaveFailed,
            ErrorCode::ApprovalRequestFailed,
            ErrorCode::NotificationFailed,
            ErrorCode::DecisionFailed,
            ErrorCode::OwnerRequired,
            ErrorCode::InternalError,
            ErrorCode::UpstreamError,
            ErrorCode::NetworkError,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
            ErrorCode::InvalidUpstreamResponse,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::LinkTokenMissing).unwrap();
        assert_eq!(json, "4002");

        let code: ErrorCode = serde_json::from_str("1005").unwrap();
        assert_eq!(code, ErrorCode::SessionExpired);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::NotFound), "3");
        assert_eq!(ErrorCode::SaveFailed.message(), "Failed to save evaluation data");
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }
}
