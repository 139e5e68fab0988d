//! Approval responder
//!
//! Loads the batch and the approver metadata of one link and records the
//! approver's decision. Decisions are offered only while a loaded batch sits
//! under a link whose fetched status is pending.

use serde::Serialize;
use thiserror::Error;

use eva_client::{ClientError, EvaApi};
use shared::error::{AppError, ErrorCode};
use shared::models::{ApprovalStatus, ApproverInfo, Decision, EvaluationRecord, format_thai_datetime};

use crate::error::remote_failure_code;

const RECORDS_REJECTED_MESSAGE: &str = "ไม่สามารถโหลดข้อมูลได้";
const RECORDS_TRANSPORT_MESSAGE: &str = "เกิดข้อผิดพลาดในการโหลดข้อมูล";
const DECISION_TRANSPORT_MESSAGE: &str = "เกิดข้อผิดพลาดในการส่งข้อมูล";

/// What the approval page renders
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalView {
    pub records: Vec<EvaluationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver: Option<ApproverInfo>,
    pub status: ApprovalStatus,
    /// Badge text once resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<String>,
    pub can_decide: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ApprovalView {
    fn assemble(
        records: Result<Vec<EvaluationRecord>, String>,
        approver: Option<ApproverInfo>,
    ) -> Self {
        let status = approver
            .as_ref()
            .map_or(ApprovalStatus::Unknown, ApproverInfo::status);
        let decided_at = status
            .label()
            .map(|_| format_thai_datetime(approver.as_ref().and_then(|a| a.decided_at.as_deref())));

        let (records, records_error) = match records {
            Ok(records) => (records, None),
            Err(message) => (Vec::new(), Some(message)),
        };
        let can_decide = records_error.is_none() && !records.is_empty() && status.is_pending();

        Self {
            records,
            records_error,
            approver,
            status,
            status_label: status.label(),
            decided_at,
            can_decide,
            notice: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecisionError {
    /// The caller has not confirmed; carries the prompt to show
    #[error("{0}")]
    NotConfirmed(String),

    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ClientError,
    },
}

impl From<DecisionError> for AppError {
    fn from(err: DecisionError) -> Self {
        match err {
            DecisionError::NotConfirmed(prompt) => {
                AppError::with_message(ErrorCode::DecisionNotConfirmed, prompt)
            }
            DecisionError::Failed { message, source } => AppError::with_message(
                remote_failure_code(&source, ErrorCode::DecisionFailed),
                message,
            ),
        }
    }
}

async fn load_records(api: &EvaApi, token: &str) -> Result<Vec<EvaluationRecord>, String> {
    match api.approval_records(token).await {
        Ok(list) if list.is_failure() => {
            Err(list.error.unwrap_or_else(|| RECORDS_REJECTED_MESSAGE.to_string()))
        }
        Ok(list) => Ok(list.records),
        Err(e) => {
            tracing::warn!(error = %e, "Approval batch load failed");
            Err(e
                .remote_message()
                .unwrap_or(RECORDS_TRANSPORT_MESSAGE)
                .to_string())
        }
    }
}

/// Approver metadata; any failure leaves it absent so no decision is offered
async fn load_approver(api: &EvaApi, token: &str) -> Option<ApproverInfo> {
    api.approval_info(token).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Approver metadata load failed");
        None
    })
}

/// Loads both halves of the view concurrently
pub async fn load(api: &EvaApi, token: &str) -> ApprovalView {
    let (records, approver) = tokio::join!(load_records(api, token), load_approver(api, token));
    ApprovalView::assemble(records, approver)
}

/// Records `decision` once confirmed, then reloads the view from the store
pub async fn decide(
    api: &EvaApi,
    token: &str,
    decision: Decision,
    confirmed: bool,
) -> Result<ApprovalView, DecisionError> {
    if !confirmed {
        return Err(DecisionError::NotConfirmed(decision.confirmation_prompt()));
    }

    tracing::debug!(token, decision = decision.code(), "Submitting decision");
    if let Err(source) = api.submit_decision(token, decision).await {
        tracing::warn!(token, error = %source, "Decision submission failed");
        let message = if source.is_transport() {
            DECISION_TRANSPORT_MESSAGE.to_string()
        } else {
            source
                .remote_message()
                .map(str::to_string)
                .unwrap_or_else(|| decision.failure_message())
        };
        return Err(DecisionError::Failed { message, source });
    }

    tracing::info!(token, decision = decision.code(), "Decision recorded");
    let mut view = load(api, token).await;
    view.notice = Some(decision.success_message());
    Ok(view)
}
