//! Typed record-store facade
//!
//! Wraps a [`Backend`] with one method per operation. List calls go through
//! [`normalize_list`] here and nowhere else.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use shared::envelope::{RecordList, approver_info_from, is_explicit_failure, message_of, normalize_list};
use shared::models::{
    AdminOption, ApproverInfo, CreateApprovalRequest, Decision, DecisionSubmission, Employee,
    EvaluationRecord, LinkQuery, OwnerQuery, SaveAssignment,
};

use crate::{Backend, ClientError, ClientResult, Endpoint};

/// Fallback when a save is refused without a message
const SAVE_FALLBACK_MESSAGE: &str = "Unknown error";

#[derive(Clone)]
pub struct EvaApi {
    backend: Arc<dyn Backend>,
}

impl EvaApi {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    async fn post<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> ClientResult<Value> {
        let body = serde_json::to_value(body)?;
        self.backend.call(endpoint, Some(body)).await
    }

    async fn list<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
    ) -> ClientResult<RecordList<T>> {
        let response = match body {
            Some(body) => self.post(endpoint, body).await?,
            None => self.backend.call(endpoint, None).await?,
        };
        normalize_list(&response).map_err(|e| {
            ClientError::InvalidResponse(format!("{endpoint} returned unreadable rows: {e}"))
        })
    }

    // ========== Lists ==========

    pub async fn list_admins(&self) -> ClientResult<RecordList<AdminOption>> {
        self.list(Endpoint::Admins, Some(&serde_json::json!({}))).await
    }

    pub async fn list_records(&self, owner_code: &str) -> ClientResult<RecordList<EvaluationRecord>> {
        self.list(Endpoint::Records, Some(&OwnerQuery { owner_code })).await
    }

    /// Full employee directory
    pub async fn list_directory(&self) -> ClientResult<RecordList<Employee>> {
        self.list::<_, Value>(Endpoint::Directory, None).await
    }

    pub async fn approval_records(&self, token: &str) -> ClientResult<RecordList<EvaluationRecord>> {
        self.list(Endpoint::ApprovalRecords, Some(&LinkQuery { token })).await
    }

    // ========== Approval links ==========

    /// Approver metadata of a link; `None` when the response holds none
    pub async fn approval_info(&self, token: &str) -> ClientResult<Option<ApproverInfo>> {
        let response = self.post(Endpoint::ApprovalInfo, &LinkQuery { token }).await?;
        Ok(approver_info_from(&response))
    }

    /// Creates a pending approval request; the raw response carries the link token
    pub async fn create_approval(&self, request: &CreateApprovalRequest) -> ClientResult<Value> {
        self.post(Endpoint::CreateApproval, request).await
    }

    pub async fn submit_decision(&self, token: &str, decision: Decision) -> ClientResult<Value> {
        let submission = DecisionSubmission {
            token,
            decision: decision.code(),
        };
        let response = self.post(Endpoint::SubmitDecision, &submission).await?;
        ensure_success(response, &decision.failure_message())
    }

    // ========== Evaluators ==========

    pub async fn save_evaluators(&self, assignment: &SaveAssignment) -> ClientResult<Value> {
        let response = self.post(Endpoint::SaveEvaluators, assignment).await?;
        ensure_success(response, SAVE_FALLBACK_MESSAGE)
    }
}

/// Turns an explicit `success: false` body into [`ClientError::Rejected`]
fn ensure_success(body: Value, fallback: &str) -> ClientResult<Value> {
    if is_explicit_failure(&body) {
        let message = message_of(&body).unwrap_or_else(|| fallback.to_string());
        return Err(ClientError::Rejected(message));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every call with one canned body and records what was sent
    struct Canned {
        response: Value,
        calls: Mutex<Vec<(Endpoint, Option<Value>)>>,
    }

    impl Canned {
        fn new(response: Value) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Backend for Canned {
        async fn call(&self, endpoint: Endpoint, body: Option<Value>) -> ClientResult<Value> {
            self.calls.lock().unwrap().push((endpoint, body));
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_list_records_sends_owner_code() {
        let backend = Canned::new(json!({"data": [{"id": 1, "EmplCode": "E1", "CCTR": "C9"}]}));
        let api = EvaApi::new(backend.clone());

        let list = api.list_records("480011").await.unwrap();
        assert_eq!(list.records.len(), 1);
        assert_eq!(list.records[0].cctr.as_deref(), Some("C9"));

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].0, Endpoint::Records);
        assert_eq!(calls[0].1, Some(json!({"EmplCode": "480011"})));
    }

    #[tokio::test]
    async fn test_directory_sends_no_body() {
        let backend = Canned::new(json!([{"EMPL_CODE": "1", "TNAME": "A"}]));
        let api = EvaApi::new(backend.clone());

        let list = api.list_directory().await.unwrap();
        assert_eq!(list.records[0].label(), "1 - A");
        assert_eq!(backend.calls.lock().unwrap()[0], (Endpoint::Directory, None));
    }

    #[tokio::test]
    async fn test_list_admins_surfaces_failure_message() {
        let api = EvaApi::new(Canned::new(json!({"success": false, "message": "no admins"})));
        let list = api.list_admins().await.unwrap();
        assert!(list.is_empty());
        assert_eq!(list.error.as_deref(), Some("no admins"));
    }

    #[tokio::test]
    async fn test_save_rejected_message() {
        let assignment = SaveAssignment {
            id: 5,
            evaluator1: "111".to_string(),
            evaluator2: String::new(),
            evaluator3: String::new(),
            admin_code: "900".to_string(),
        };

        let api = EvaApi::new(Canned::new(json!({"success": false, "message": "locked"})));
        let err = api.save_evaluators(&assignment).await.unwrap_err();
        assert_eq!(err.to_string(), "locked");

        let api = EvaApi::new(Canned::new(json!({"success": false})));
        let err = api.save_evaluators(&assignment).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown error");

        let api = EvaApi::new(Canned::new(json!({"success": true})));
        assert!(api.save_evaluators(&assignment).await.is_ok());
    }

    #[tokio::test]
    async fn test_decision_wire_body_and_fallback() {
        let backend = Canned::new(json!({"success": false}));
        let api = EvaApi::new(backend.clone());

        let err = api.submit_decision("TOK", Decision::Reject).await.unwrap_err();
        assert_eq!(err.to_string(), "เกิดข้อผิดพลาดในการไม่อนุมัติ");
        assert_eq!(
            backend.calls.lock().unwrap()[0].1,
            Some(json!({"ApproveLinkCode": "TOK", "Result": 2}))
        );
    }

    #[tokio::test]
    async fn test_approval_info_first_element() {
        let api = EvaApi::new(Canned::new(json!([{"FullnameTH": "Approver", "ApproveStatus": "1"}])));
        let info = api.approval_info("TOK").await.unwrap().unwrap();
        assert_eq!(info.name.as_deref(), Some("Approver"));
        assert_eq!(info.status_code, Some(1));
    }
}
