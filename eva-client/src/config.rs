//! Client configuration

use std::time::Duration;

use crate::{ClientError, ClientResult};

pub const DEFAULT_BACKEND_URL: &str = "https://api.airportthai.co.th/API2/eva";
pub const DEFAULT_GATEWAY_URL: &str = "https://api.airportthai.co.th/V1/AOTStaff/SendMessage/";
pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// Endpoints and transport settings for all remote collaborators
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Record store base URL (e.g., "https://api.airportthai.co.th/API2/eva")
    pub backend_url: String,

    /// Messaging gateway endpoint
    pub gateway_url: String,

    /// `x-api-key` for the messaging gateway
    pub gateway_api_key: Option<String>,

    /// Identity provider base URL
    pub graph_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            gateway_api_key: None,
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            timeout: 30,
        }
    }

    /// Set the messaging gateway endpoint and key
    pub fn with_gateway(mut self, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self.gateway_api_key = Some(api_key.into());
        self
    }

    /// Set the identity provider base URL
    pub fn with_graph_url(mut self, url: impl Into<String>) -> Self {
        self.graph_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Build the shared reqwest client
    pub fn build_reqwest(&self) -> ClientResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .build()
            .map_err(ClientError::from)
    }

    pub fn build_backend(&self, client: reqwest::Client) -> super::HttpBackend {
        super::HttpBackend::new(client, &self.backend_url)
    }

    pub fn build_gateway(&self, client: reqwest::Client) -> ClientResult<super::HttpGateway> {
        let api_key = self
            .gateway_api_key
            .clone()
            .ok_or(ClientError::NotConfigured("messaging gateway API key"))?;
        Ok(super::HttpGateway::new(client, &self.gateway_url, api_key))
    }

    pub fn build_graph(&self, client: reqwest::Client) -> super::GraphClient {
        super::GraphClient::new(client, &self.graph_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_requires_key() {
        let config = ClientConfig::default();
        let client = config.build_reqwest().unwrap();
        assert!(matches!(
            config.build_gateway(client),
            Err(ClientError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://backend")
            .with_gateway("http://gw", "k")
            .with_graph_url("http://graph")
            .with_timeout(5);
        assert_eq!(config.backend_url, "http://backend");
        assert_eq!(config.gateway_api_key.as_deref(), Some("k"));
        assert_eq!(config.graph_url, "http://graph");
        assert_eq!(config.timeout, 5);
    }
}
