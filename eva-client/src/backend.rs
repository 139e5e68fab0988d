//! Record store transport
//!
//! Every record-store call is a JSON `POST` to `<base>/<path>`. Response bodies
//! are read as text first: the store sometimes answers with plain text, which
//! is wrapped into the usual `{success, message}` object.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use shared::envelope::message_of;

use crate::{ClientError, ClientResult};

/// Record store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Admins,
    Records,
    Directory,
    SaveEvaluators,
    CreateApproval,
    ApprovalInfo,
    ApprovalRecords,
    SubmitDecision,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Admins => "getAdmin",
            Self::Records => "EvaGetData",
            Self::Directory => "getEmployeeERP",
            Self::SaveEvaluators => "EvaSaveData",
            Self::CreateApproval => "updateApproval",
            Self::ApprovalInfo => "getApprovalLinkCode",
            Self::ApprovalRecords => "getDataApproval",
            Self::SubmitDecision => "sendApprove",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// The external record store
#[async_trait]
pub trait Backend: Send + Sync {
    /// Issue one call; `None` sends no body at all
    async fn call(&self, endpoint: Endpoint, body: Option<Value>) -> ClientResult<Value>;
}

/// Record store over HTTPS
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn call(&self, endpoint: Endpoint, body: Option<Value>) -> ClientResult<Value> {
        let mut request = self
            .client
            .post(self.url(endpoint))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let result = interpret_response(status, &text);
        if let Err(e) = &result {
            tracing::warn!(endpoint = %endpoint, status, error = %e, "Record store call failed");
        }
        result
    }
}

/// Applies the text-or-JSON rule and the non-2xx rule to a raw response
pub fn interpret_response(status: u16, text: &str) -> ClientResult<Value> {
    let ok = (200..300).contains(&status);
    let body = serde_json::from_str::<Value>(text).unwrap_or_else(|_| {
        let message = if text.is_empty() { "Unknown response" } else { text };
        json!({ "success": ok, "message": message })
    });

    if !ok {
        return Err(ClientError::Backend {
            status,
            message: message_of(&body).unwrap_or_else(|| format!("Backend error: {status}")),
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_passes_through() {
        let body = interpret_response(200, r#"[{"id":1}]"#).unwrap();
        assert_eq!(body, json!([{"id": 1}]));
    }

    #[test]
    fn test_text_body_is_wrapped() {
        let body = interpret_response(200, "saved").unwrap();
        assert_eq!(body, json!({"success": true, "message": "saved"}));

        let body = interpret_response(204, "").unwrap();
        assert_eq!(body, json!({"success": true, "message": "Unknown response"}));
    }

    #[test]
    fn test_error_status_uses_body_message() {
        let err = interpret_response(500, r#"{"message":"db down"}"#).unwrap_err();
        assert!(matches!(err, ClientError::Backend { status: 500, .. }));
        assert_eq!(err.to_string(), "db down");

        let err = interpret_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(err.to_string(), "Bad Gateway");
    }

    #[test]
    fn test_error_status_fallback_message() {
        let err = interpret_response(404, "{}").unwrap_err();
        assert_eq!(err.to_string(), "Backend error: 404");

        let err = interpret_response(503, "").unwrap_err();
        assert_eq!(err.to_string(), "Unknown response");
    }

    #[test]
    fn test_url_join() {
        let client = Client::new();
        let backend = HttpBackend::new(client, "http://store/API2/eva/");
        assert_eq!(backend.url(Endpoint::SaveEvaluators), "http://store/API2/eva/EvaSaveData");
        assert_eq!(Endpoint::CreateApproval.to_string(), "updateApproval");
    }
}
