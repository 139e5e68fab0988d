//! Identity provider id tokens
//!
//! Claims from the sign-in id token are trusted only once the token's
//! signature, audience, issuer and expiry check out against the key set the
//! identity provider publishes.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use thiserror::Error;

use eva_client::{ClientError, KeySetSource};
use shared::error::AppError;
use shared::models::UserProfile;

use crate::cache::TtlCache;
use crate::error::upstream_error;

const KEY_SET_CACHE_KEY: &str = "jwks";
const KEY_SET_TTL: Duration = Duration::from_secs(3600);

/// Claims read from a verified id token
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    /// Directory object id; matches the profile id
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(rename = "jobTitle", default)]
    pub job_title: Option<String>,
    #[serde(rename = "employeeId", default)]
    pub employee_id: Option<String>,
}

impl IdTokenClaims {
    pub fn subject(&self) -> &str {
        self.oid.as_deref().unwrap_or(&self.sub)
    }

    pub fn employee_code(&self) -> Option<&str> {
        self.employee_id
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Profile built from the claims alone
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.subject().to_string(),
            display_name: self
                .name
                .clone()
                .or_else(|| self.preferred_username.clone())
                .unwrap_or_default(),
            job_title: self.job_title.clone(),
            mail: self.email.clone().or_else(|| self.preferred_username.clone()),
            employee_id: self.employee_code().map(str::to_string),
            photo: None,
        }
    }

    /// Fills a missing employee code of the same user's profile
    pub fn complete(&self, profile: &mut UserProfile) {
        if profile.employee_code().is_some() || profile.id != self.subject() {
            return;
        }
        if let Some(code) = self.employee_code() {
            profile.employee_id = Some(code.to_string());
        }
    }
}

#[derive(Debug, Error)]
pub enum IdTokenError {
    #[error("Id token rejected: {0}")]
    Invalid(String),

    #[error("Signing key {0} is not published")]
    UnknownKey(String),

    #[error("Signing keys unavailable: {0}")]
    KeySet(#[from] ClientError),
}

impl From<IdTokenError> for AppError {
    fn from(err: IdTokenError) -> Self {
        match err {
            IdTokenError::KeySet(e) => upstream_error(e, "Failed to fetch signing keys"),
            other => {
                tracing::warn!(error = %other, "Id token refused");
                AppError::invalid_token("Invalid id token")
            }
        }
    }
}

/// Verifies id tokens against the provider's published keys
pub struct IdTokenVerifier {
    source: Arc<dyn KeySetSource>,
    keys: TtlCache<JwkSet>,
    audience: String,
    issuer: Option<String>,
    algorithms: Vec<Algorithm>,
}

impl IdTokenVerifier {
    /// Accepts RS256 tokens issued for `audience`
    pub fn new(source: Arc<dyn KeySetSource>, audience: impl Into<String>) -> Self {
        Self {
            source,
            keys: TtlCache::in_memory(),
            audience: audience.into(),
            issuer: None,
            algorithms: vec![Algorithm::RS256],
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_algorithms(mut self, algorithms: &[Algorithm]) -> Self {
        self.algorithms = algorithms.to_vec();
        self
    }

    pub async fn verify(&self, token: &str) -> Result<IdTokenClaims, IdTokenError> {
        let header = decode_header(token).map_err(|e| IdTokenError::Invalid(e.to_string()))?;
        if !self.algorithms.contains(&header.alg) {
            return Err(IdTokenError::Invalid(format!(
                "algorithm {:?} is not accepted",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| IdTokenError::Invalid("missing key id".to_string()))?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[self.audience.as_str()]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        decode::<IdTokenClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| IdTokenError::Invalid(e.to_string()))
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdTokenError> {
        let keys = self.key_set().await?;
        let jwk = match keys.find(kid) {
            Some(jwk) => jwk.clone(),
            None => {
                // Keys rotate; refetch once before refusing
                self.keys.invalidate(KEY_SET_CACHE_KEY).await;
                let keys = self.key_set().await?;
                keys.find(kid)
                    .cloned()
                    .ok_or_else(|| IdTokenError::UnknownKey(kid.to_string()))?
            }
        };
        DecodingKey::from_jwk(&jwk).map_err(|e| IdTokenError::Invalid(e.to_string()))
    }

    async fn key_set(&self) -> Result<JwkSet, IdTokenError> {
        let source = self.source.clone();
        self.keys
            .get_or_fetch(KEY_SET_CACHE_KEY, KEY_SET_TTL, || async move {
                let body = source.fetch_key_set().await?;
                let keys: JwkSet = serde_json::from_value(body).map_err(ClientError::from)?;
                tracing::debug!(count = keys.keys.len(), "Signing keys refreshed");
                Ok(keys)
            })
            .await
    }
}
