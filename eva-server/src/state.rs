//! Application state for eva-server

use std::sync::Arc;
use std::time::Duration;

use eva_client::{Backend, ClientConfig, EvaApi, HttpKeySet, Notifier, ProfileSource};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Employee;

use crate::auth::{IdTokenVerifier, JwtService, SessionStore};
use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::upstream_error;
use crate::inflight::InFlight;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const DIRECTORY_CACHE_KEY: &str = "directory";
const DIRECTORY_FALLBACK_MESSAGE: &str = "Failed to fetch employees";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Record store facade
    pub api: EvaApi,
    /// Messaging gateway
    pub notifier: Arc<dyn Notifier>,
    /// Identity provider profile source
    pub profiles: Arc<dyn ProfileSource>,
    /// Sign-in id token checks; `None` when no audience is configured
    pub id_tokens: Option<Arc<IdTokenVerifier>>,
    pub jwt: JwtService,
    pub sessions: SessionStore,
    /// Employee directory cache
    pub directory: TtlCache<Vec<Employee>>,
    pub inflight: InFlight,
}

impl AppState {
    /// Create a new AppState talking to the configured remote services
    pub fn new(config: &Config) -> Result<Self, BoxError> {
        let client_config = ClientConfig::new(&config.eva_api_base_url)
            .with_gateway(&config.message_gateway_url, &config.message_api_key)
            .with_graph_url(&config.graph_base_url)
            .with_timeout(config.request_timeout_secs);

        let http = client_config.build_reqwest()?;
        let backend = client_config.build_backend(http.clone());
        let gateway = client_config.build_gateway(http.clone())?;
        let graph = client_config.build_graph(http.clone());

        let mut state = Self::with_collaborators(
            config.clone(),
            Arc::new(backend),
            Arc::new(gateway),
            Arc::new(graph),
        );

        if let Some(audience) = &config.oidc_audience {
            let keys = HttpKeySet::new(http, &config.oidc_jwks_url);
            let mut verifier = IdTokenVerifier::new(Arc::new(keys), audience);
            if let Some(issuer) = &config.oidc_issuer {
                verifier = verifier.with_issuer(issuer);
            }
            state = state.with_id_token_verifier(verifier);
        } else {
            tracing::warn!("OIDC_AUDIENCE not set; sign-in id tokens are ignored");
        }
        Ok(state)
    }

    /// Create a state over arbitrary collaborators
    pub fn with_collaborators(
        config: Config,
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn Notifier>,
        profiles: Arc<dyn ProfileSource>,
    ) -> Self {
        Self {
            jwt: JwtService::new(&config.jwt_secret),
            config: Arc::new(config),
            api: EvaApi::new(backend),
            notifier,
            profiles,
            id_tokens: None,
            sessions: SessionStore::new(),
            directory: TtlCache::in_memory(),
            inflight: InFlight::new(),
        }
    }

    pub fn with_id_token_verifier(mut self, verifier: IdTokenVerifier) -> Self {
        self.id_tokens = Some(Arc::new(verifier));
        self
    }

    pub fn directory_ttl(&self) -> Duration {
        self.config.directory_cache_ttl()
    }

    /// Employee directory, served from cache while fresh
    pub async fn directory(&self) -> AppResult<Vec<Employee>> {
        let api = self.api.clone();
        self.directory
            .get_or_fetch(DIRECTORY_CACHE_KEY, self.directory_ttl(), || async move {
                let list = api
                    .list_directory()
                    .await
                    .map_err(|e| upstream_error(e, DIRECTORY_FALLBACK_MESSAGE))?;
                if list.is_failure() {
                    let message = list
                        .error
                        .unwrap_or_else(|| DIRECTORY_FALLBACK_MESSAGE.to_string());
                    return Err(AppError::with_message(ErrorCode::UpstreamError, message));
                }
                tracing::info!(count = list.records.len(), "Employee directory refreshed");
                Ok(list.records)
            })
            .await
    }
}
