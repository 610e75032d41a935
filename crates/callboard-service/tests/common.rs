//! Common test utilities for callboard integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use callboard_client::{
    CallApiClient, CallProvider, ClientOptions, IdentityProvider, SocialIdentityClient,
    DEFAULT_API_VERSION,
};
use callboard_core::{ItemId, UserId};
use callboard_service::{create_router, AppState, ServiceConfig};
use callboard_store::{LikeStore, RocksStore};

/// Number of like items seeded in every harness.
pub const LIKE_ITEMS: u32 = 5;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store access for arranging and inspecting state.
    pub store: Arc<RocksStore>,
    /// Mock call provider.
    pub calls: MockServer,
    /// Mock identity provider.
    pub identity: MockServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a harness with both providers backed by mock servers.
    pub async fn new() -> Self {
        Self::build(true, None).await
    }

    /// Create a harness with no provider clients configured.
    pub async fn without_providers() -> Self {
        Self::build(false, None).await
    }

    /// Create a harness whose call provider address refuses connections.
    pub async fn with_unreachable_call_provider() -> Self {
        let closed = MockServer::start().await;
        let url = closed.uri();
        drop(closed);
        Self::build(true, Some(url)).await
    }

    async fn build(with_providers: bool, call_api_url: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let items: Vec<ItemId> = (1..=LIKE_ITEMS).map(ItemId).collect();
        store.seed_items(&items).expect("Failed to seed like items");

        let calls = MockServer::start().await;
        let identity = MockServer::start().await;

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            cors_origins: vec!["*".into()],
            ..ServiceConfig::default()
        };

        let (call_provider, identity_provider) = if with_providers {
            let options = ClientOptions::with_timeout(5);
            let call_url = call_api_url.unwrap_or_else(|| calls.uri());
            let call_client = CallApiClient::new(call_url, "pk-test", options.clone())
                .expect("Failed to create call client");
            let identity_client = SocialIdentityClient::new(
                identity.uri(),
                "token-test",
                DEFAULT_API_VERSION,
                options,
            )
            .expect("Failed to create identity client");
            (
                Some(Arc::new(call_client) as Arc<dyn CallProvider>),
                Some(Arc::new(identity_client) as Arc<dyn IdentityProvider>),
            )
        } else {
            (None, None)
        };

        let state = AppState::with_providers(store.clone(), config, call_provider, identity_provider);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            calls,
            identity,
            _temp_dir: temp_dir,
        }
    }

    /// Set a user's balance directly through the store.
    pub fn set_balance(&self, user: i64, coins: i64) {
        use callboard_store::LedgerStore;
        let user = UserId::new(user);
        let current = self.store.get_balance(user).expect("Failed to read balance");
        match coins.cmp(&current) {
            std::cmp::Ordering::Greater => {
                self.store
                    .credit(user, coins - current)
                    .expect("Failed to credit user");
            }
            std::cmp::Ordering::Less => {
                self.store
                    .debit(user, current - coins)
                    .expect("Failed to debit user");
            }
            std::cmp::Ordering::Equal => {}
        }
    }

    /// Make the call provider accept calls and return the given id.
    pub async fn accept_calls(&self, call_id: u64) {
        Mock::given(method("POST"))
            .and(path("/phones/call/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"call_id": call_id, "status": "ok"})),
            )
            .mount(&self.calls)
            .await;
    }
}

/// A valid call placement body for `user`.
pub fn call_body(user: i64, category: &str) -> serde_json::Value {
    json!({
        "phone": "79990000000",
        "campaign_id": "555",
        "max_call_time": "60",
        "audioclip_text": "Hello there",
        "userId": user.to_string(),
        "category": category
    })
}
