//! Session token service
//!
//! Session tokens are HS256 JWTs whose `sub` is the session id. The token
//! alone does not authorize anything; the session it names must still be live.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims stored in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Session id
    pub sub: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: i64,
    /// Issued at (Unix timestamp seconds)
    pub iat: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService").finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for `session_id` valid until `expires_at`
    pub fn create_token(&self, session_id: &str, expires_at: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = SessionClaims {
            sub: session_id.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Token part of a `Bearer <token>` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_round_trip_subject() {
        let jwt = JwtService::new("test-secret-with-enough-length-0123");
        let token = jwt
            .create_token("session-1", Utc::now() + Duration::hours(1))
            .unwrap();
        assert_eq!(jwt.validate_token(&token).unwrap().sub, "session-1");
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new("test-secret-with-enough-length-0123");
        let token = jwt
            .create_token("session-1", Utc::now() - Duration::hours(1))
            .unwrap();
        assert!(matches!(jwt.validate_token(&token), Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new("secret-a-secret-a-secret-a-secret-a")
            .create_token("s", Utc::now() + Duration::hours(1))
            .unwrap();
        let other = JwtService::new("secret-b-secret-b-secret-b-secret-b");
        assert!(matches!(other.validate_token(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
