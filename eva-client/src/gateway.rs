//! Staff messaging gateway

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::ClientResult;
use crate::backend::interpret_response;

const MESSAGE_TITLE: &str = "รายชื่อผู้ประเมิน";
const MESSAGE_SOURCE: &str = "AOT";

/// One message to the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayMessage {
    pub to: Vec<String>,
    pub title: String,
    pub source: String,
    pub app_url: String,
    pub messages: Vec<GatewayText>,
}

/// Text part of a gateway message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(rename = "originalContentUrl")]
    pub original_content_url: Option<String>,
    #[serde(rename = "previewImageUrl")]
    pub preview_image_url: Option<String>,
}

impl GatewayMessage {
    /// Approval request addressed to one approver, linking to the approval page
    pub fn approval_request(approver: impl Into<String>, link: &str) -> Self {
        Self {
            to: vec![approver.into()],
            title: MESSAGE_TITLE.to_string(),
            source: MESSAGE_SOURCE.to_string(),
            app_url: String::new(),
            messages: vec![GatewayText {
                kind: "text".to_string(),
                text: approval_text(link),
                original_content_url: None,
                preview_image_url: None,
            }],
        }
    }
}

/// Instruction text with the link wrapped in an anchor
pub fn approval_text(link: &str) -> String {
    format!("กรุณาอนุมัติรายชื่อผู้ประเมิน <a href='{link}'>คลิกที่นี่</a>")
}

/// Delivers messages to staff
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &GatewayMessage) -> ClientResult<Value>;
}

/// Messaging gateway over HTTPS
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    url: String,
    api_key: String,
}

impl HttpGateway {
    pub fn new(client: Client, url: &str, api_key: String) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl Notifier for HttpGateway {
    async fn send(&self, message: &GatewayMessage) -> ClientResult<Value> {
        tracing::debug!(to = ?message.to, "Sending gateway message");

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .json(message)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let result = interpret_response(status, &text);
        if let Err(e) = &result {
            tracing::warn!(status, error = %e, "Gateway rejected message");
        }
        result
    }
}
