//! Console server configuration

use std::collections::HashSet;

use eva_client::config::{DEFAULT_BACKEND_URL, DEFAULT_GATEWAY_URL, DEFAULT_GRAPH_URL};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const DEFAULT_JWKS_URL: &str = "https://login.microsoftonline.com/common/discovery/v2.0/keys";
const DEV_PUBLIC_ORIGIN: &str = "http://localhost:3000";
const MAX_SESSION_TTL_HOURS: i64 = 24 * 30;
const MAX_DIRECTORY_CACHE_TTL_SECS: u64 = 7 * 86_400;

/// Console server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// Record store base URL
    pub eva_api_base_url: String,
    /// Messaging gateway endpoint
    pub message_gateway_url: String,
    /// Messaging gateway `x-api-key`
    pub message_api_key: String,
    /// Identity provider base URL
    pub graph_base_url: String,
    /// Front-end origin serving the `/approval/{token}` page links point at
    pub public_origin: String,
    /// Session token signing secret
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    /// Identity provider key set id tokens are checked against
    pub oidc_jwks_url: String,
    /// Expected id token audience (the app's client id); unset disables id tokens
    pub oidc_audience: Option<String>,
    pub oidc_issuer: Option<String>,
    /// Employee codes granted the admin views
    pub admin_employee_codes: HashSet<String>,
    pub directory_cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Setting with a development-only default
    fn required_outside_development(
        name: &str,
        environment: &str,
        dev_default: &str,
    ) -> Result<String, BoxError> {
        match optional(name) {
            Some(value) => Ok(value),
            None if environment == "development" => Ok(dev_default.to_string()),
            None => Err(format!("{name} must be set in {environment} environment").into()),
        }
    }

    fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: Self::parsed("HTTP_PORT", 8080),
            eva_api_base_url: std::env::var("EVA_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.into()),
            message_gateway_url: std::env::var("MESSAGE_GATEWAY_URL")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.into()),
            message_api_key: Self::require_secret("MESSAGE_API_KEY", &environment)?,
            graph_base_url: std::env::var("GRAPH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GRAPH_URL.into()),
            public_origin: Self::required_outside_development(
                "PUBLIC_ORIGIN",
                &environment,
                DEV_PUBLIC_ORIGIN,
            )?,
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            session_ttl_hours: Self::parsed("SESSION_TTL_HOURS", 8_i64)
                .clamp(1, MAX_SESSION_TTL_HOURS),
            oidc_jwks_url: optional("OIDC_JWKS_URL").unwrap_or_else(|| DEFAULT_JWKS_URL.into()),
            oidc_audience: optional("OIDC_AUDIENCE"),
            oidc_issuer: optional("OIDC_ISSUER"),
            admin_employee_codes: parse_code_list(
                &std::env::var("ADMIN_EMPLOYEE_CODES").unwrap_or_default(),
            ),
            directory_cache_ttl_secs: Self::parsed("DIRECTORY_CACHE_TTL_SECS", 86_400_u64)
                .min(MAX_DIRECTORY_CACHE_TTL_SECS),
            request_timeout_secs: Self::parsed("REQUEST_TIMEOUT_SECS", 30),
            environment,
        })
    }

    /// Development defaults without reading the environment
    pub fn development() -> Self {
        Self {
            environment: "development".into(),
            http_port: 8080,
            eva_api_base_url: DEFAULT_BACKEND_URL.into(),
            message_gateway_url: DEFAULT_GATEWAY_URL.into(),
            message_api_key: "dev-MESSAGE_API_KEY-not-for-production".into(),
            graph_base_url: DEFAULT_GRAPH_URL.into(),
            public_origin: DEV_PUBLIC_ORIGIN.into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            session_ttl_hours: 8,
            oidc_jwks_url: DEFAULT_JWKS_URL.into(),
            oidc_audience: None,
            oidc_issuer: None,
            admin_employee_codes: HashSet::new(),
            directory_cache_ttl_secs: 86_400,
            request_timeout_secs: 30,
        }
    }

    /// Session lifetime, between one hour and 30 days
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS))
    }

    /// Directory cache lifetime, at most a week
    pub fn directory_cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.directory_cache_ttl_secs.min(MAX_DIRECTORY_CACHE_TTL_SECS))
    }

    pub fn is_admin_code(&self, code: &str) -> bool {
        self.admin_employee_codes.contains(code)
    }
}

/// Trimmed, non-empty env var
fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma separated codes, blanks dropped
fn parse_code_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
