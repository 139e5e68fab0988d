//! Identity provider signing keys

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// Publishes the JSON Web Key set id tokens are signed with
#[async_trait]
pub trait KeySetSource: Send + Sync {
    /// Raw `{"keys": [...]}` document
    async fn fetch_key_set(&self) -> ClientResult<Value>;
}

/// Key set served over HTTPS (the provider's `jwks_uri`)
#[derive(Debug, Clone)]
pub struct HttpKeySet {
    client: Client,
    url: String,
}

impl HttpKeySet {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl KeySetSource for HttpKeySet {
    async fn fetch_key_set(&self) -> ClientResult<Value> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message: format!("Key set request failed: {status}"),
            });
        }
        response.json().await.map_err(Into::into)
    }
}
