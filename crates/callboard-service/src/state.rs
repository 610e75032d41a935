//! Application state.

use std::sync::Arc;

use callboard_client::{
    CallApiClient, CallProvider, ClientOptions, IdentityProvider, SocialIdentityClient,
};
use callboard_store::RocksStore;

use crate::awards::AchievementAwarder;
use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::orchestrator::CallOrchestrator;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Call provider (optional).
    pub calls: Option<Arc<dyn CallProvider>>,

    /// Social identity provider (optional).
    pub identity: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    /// Create a new application state, building provider clients from config.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let options = ClientOptions::with_timeout(config.provider_timeout_seconds);

        let calls = config.call_api_public_key.as_ref().and_then(|key| {
            match CallApiClient::new(&config.call_api_url, key, options.clone()) {
                Ok(client) => {
                    tracing::info!(call_api_url = %config.call_api_url, "Call provider enabled");
                    Some(Arc::new(client) as Arc<dyn CallProvider>)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create call provider client");
                    None
                }
            }
        });

        if calls.is_none() {
            tracing::warn!("Call provider not configured - call endpoints will return 502");
        }

        let identity = config.identity_access_token.as_ref().and_then(|token| {
            match SocialIdentityClient::new(
                &config.identity_api_url,
                token,
                &config.identity_api_version,
                options.clone(),
            ) {
                Ok(client) => {
                    tracing::info!(identity_api_url = %config.identity_api_url, "Identity provider enabled");
                    Some(Arc::new(client) as Arc<dyn IdentityProvider>)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create identity provider client");
                    None
                }
            }
        });

        if identity.is_none() {
            tracing::warn!("Identity provider not configured - leaderboard names will be placeholders");
        }

        Self::with_providers(store, config, calls, identity)
    }

    /// Create a state with explicit providers.
    #[must_use]
    pub fn with_providers(
        store: Arc<RocksStore>,
        config: ServiceConfig,
        calls: Option<Arc<dyn CallProvider>>,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        Self {
            store,
            config,
            calls,
            identity,
        }
    }

    /// The call provider, or a 502 if none is configured.
    pub fn call_provider(&self) -> Result<Arc<dyn CallProvider>, ApiError> {
        self.calls
            .clone()
            .ok_or_else(|| ApiError::ExternalService("call provider is not configured".into()))
    }

    /// Achievement awarder over this state's store.
    #[must_use]
    pub fn awarder(&self) -> AchievementAwarder {
        AchievementAwarder::new(self.store.clone(), self.store.clone())
    }

    /// Call orchestrator wired to this state's store and call provider.
    pub fn orchestrator(&self) -> Result<CallOrchestrator, ApiError> {
        Ok(CallOrchestrator::new(
            self.store.clone(),
            self.store.clone(),
            self.call_provider()?,
            self.awarder(),
        )
        .with_default_max_call_seconds(self.config.default_max_call_seconds))
    }
}
