//! Approval dispatcher
//!
//! Three sequential steps: create a pending approval request, derive the link
//! from the returned token, notify the approver. Any failing step aborts the
//! rest. Nothing is rolled back; a failure after the first step leaves a
//! pending request on the record store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use eva_client::gateway::GatewayMessage;
use eva_client::{ClientError, EvaApi, Notifier, TokenLookup};
use shared::envelope::{extract_link_token, is_explicit_failure, message_of};
use shared::error::{AppError, ErrorCode};
use shared::models::CreateApprovalRequest;

use crate::error::remote_failure_code;

pub const DISPATCH_SUCCESS_MESSAGE: &str = "ส่งอนุมัติเรียบร้อยแล้ว";
const APPROVER_REQUIRED_MESSAGE: &str = "กรุณาเลือกผู้อนุมัติ";
const TOKEN_MISSING_MESSAGE: &str = "ไม่ได้รับ linkCode จากระบบ";
const CREATE_FALLBACK_MESSAGE: &str = "Failed to update approval";
const NOTIFY_FALLBACK_MESSAGE: &str = "Failed to send message";

/// Request to route the current batch to an approver
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalDispatch {
    #[serde(default)]
    pub approver: String,
    /// Batch scope; may be empty
    #[serde(default)]
    pub group_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub token: String,
    pub link: String,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{}", APPROVER_REQUIRED_MESSAGE)]
    ApproverRequired,

    #[error("{message}")]
    CreateFailed {
        message: String,
        #[source]
        source: ClientError,
    },

    #[error("{}", TOKEN_MISSING_MESSAGE)]
    TokenMissing,

    /// The approval request exists but the approver was not told
    #[error("{message}")]
    NotifyFailed {
        message: String,
        link: String,
        #[source]
        source: ClientError,
    },
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        let message = err.to_string();
        match err {
            DispatchError::ApproverRequired => {
                AppError::with_message(ErrorCode::ApproverRequired, message)
            }
            DispatchError::CreateFailed { source, .. } => AppError::with_message(
                remote_failure_code(&source, ErrorCode::ApprovalRequestFailed),
                message,
            ),
            DispatchError::TokenMissing => {
                AppError::with_message(ErrorCode::LinkTokenMissing, message)
            }
            DispatchError::NotifyFailed { source, link, .. } => AppError::with_message(
                remote_failure_code(&source, ErrorCode::NotificationFailed),
                message,
            )
            .with_detail("link", link),
        }
    }
}

/// Absolute approval URL: `<origin>/approval/<token>`
pub fn approval_link(origin: &str, token: &str) -> String {
    format!("{}/approval/{}", origin.trim_end_matches('/'), token)
}

fn failure_message(err: &ClientError, fallback: &str) -> String {
    err.remote_message().unwrap_or(fallback).to_string()
}

/// Runs the dispatch sequence for `admin_id`
pub async fn dispatch(
    api: &EvaApi,
    notifier: &dyn Notifier,
    origin: &str,
    admin_id: &str,
    request: ApprovalDispatch,
) -> Result<DispatchOutcome, DispatchError> {
    let approver = request.approver.trim();
    if approver.is_empty() {
        return Err(DispatchError::ApproverRequired);
    }

    // 1. Create the pending request
    let create = CreateApprovalRequest::pending(approver, admin_id, request.group_key);
    tracing::debug!(?create, "Creating approval request");

    let response = api.create_approval(&create).await.map_err(|source| {
        tracing::warn!(error = %source, "Approval request creation failed");
        DispatchError::CreateFailed {
            message: failure_message(&source, CREATE_FALLBACK_MESSAGE),
            source,
        }
    })?;

    let token = match extract_link_token(&response) {
        TokenLookup::Found(token) => token,
        TokenLookup::NotFound => {
            tracing::warn!(%response, "No link token in approval response");
            if is_explicit_failure(&response)
                && let Some(message) = message_of(&response)
            {
                return Err(DispatchError::CreateFailed {
                    source: ClientError::Rejected(message.clone()),
                    message,
                });
            }
            return Err(DispatchError::TokenMissing);
        }
    };

    // 2. Derive the link
    let link = approval_link(origin, &token);

    // 3. Notify the approver
    let message = GatewayMessage::approval_request(approver, &link);
    if let Err(source) = notifier.send(&message).await {
        tracing::warn!(error = %source, %link, "Approval created but notification failed");
        return Err(DispatchError::NotifyFailed {
            message: failure_message(&source, NOTIFY_FALLBACK_MESSAGE),
            link,
            source,
        });
    }

    tracing::info!(approver, admin_id, %link, "Approval dispatched");
    Ok(DispatchOutcome { token, link })
}
