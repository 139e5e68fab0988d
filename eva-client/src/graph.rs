//! Identity provider profile source

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;

use shared::models::UserProfile;

use crate::{ClientError, ClientResult};

const PROFILE_SELECT: &str = "id,displayName,mail,jobTitle,employeeId";

/// Fetches the signed-in user's extended profile
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Profile for the bearer of `access_token`, photo included when available
    async fn fetch_profile(&self, access_token: &str) -> ClientResult<UserProfile>;
}

/// Microsoft Graph `/me` client
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    base_url: String,
}

impl GraphClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_me(&self, access_token: &str) -> ClientResult<UserProfile> {
        let response = self
            .client
            .get(format!("{}/me?$select={PROFILE_SELECT}", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message: format!("Profile request failed: {status}"),
            });
        }
        response.json().await.map_err(Into::into)
    }

    /// Photo as a `data:` URL; `None` when the user has none
    async fn fetch_photo(&self, access_token: &str) -> ClientResult<Option<String>> {
        let response = self
            .client
            .get(format!("{}/me/photo/$value", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?;
        Ok(Some(photo_data_url(&content_type, &bytes)))
    }
}

#[async_trait]
impl ProfileSource for GraphClient {
    async fn fetch_profile(&self, access_token: &str) -> ClientResult<UserProfile> {
        let mut profile = self.fetch_me(access_token).await?;

        match self.fetch_photo(access_token).await {
            Ok(photo) => profile.photo = photo,
            Err(e) => tracing::debug!(error = %e, "No profile photo available"),
        }
        Ok(profile)
    }
}

pub fn photo_data_url(content_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{content_type};base64,{encoded}")
}
