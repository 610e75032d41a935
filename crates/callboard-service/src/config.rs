//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use callboard_core::DEFAULT_MAX_CALL_SECONDS;

/// Default call provider API root.
pub const DEFAULT_CALL_API_URL: &str = "https://zvonok.com/manager/cabapi_external/api/v1";

/// Default social identity provider API root.
pub const DEFAULT_IDENTITY_API_URL: &str = "https://api.vk.com";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:3000").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/callboard").
    pub data_dir: String,

    /// Call provider API root.
    pub call_api_url: String,

    /// Call provider public key. Call endpoints are disabled without it.
    pub call_api_public_key: Option<String>,

    /// Identity provider API root.
    pub identity_api_url: String,

    /// Identity provider service token. Names fall back to placeholders without it.
    pub identity_access_token: Option<String>,

    /// Identity provider API version (default: "5.131").
    pub identity_api_version: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Timeout for outbound provider requests in seconds.
    pub provider_timeout_seconds: u64,

    /// Call duration cap used when a request omits `max_call_time`.
    pub default_max_call_seconds: u32,

    /// Number of audio items seeded for likes (ids `1..=like_items`).
    pub like_items: u32,

    /// Period of the achievement reconciliation pass. Disabled when `None`.
    pub reconcile_interval_seconds: Option<u64>,
}

/// Call provider secrets file structure.
#[derive(Debug, Deserialize)]
struct CallSecrets {
    #[serde(default)]
    api_url: Option<String>,
    public_key: String,
}

/// Identity provider secrets file structure.
#[derive(Debug, Deserialize)]
struct IdentitySecrets {
    #[serde(default)]
    api_url: Option<String>,
    access_token: String,
    #[serde(default)]
    api_version: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let (call_api_url, call_api_public_key) = load_call_secrets();
        let (identity_api_url, identity_access_token, identity_api_version) =
            load_identity_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            data_dir: std::env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            call_api_url: call_api_url.unwrap_or(defaults.call_api_url),
            call_api_public_key,
            identity_api_url: identity_api_url.unwrap_or(defaults.identity_api_url),
            identity_access_token,
            identity_api_version: identity_api_version.unwrap_or(defaults.identity_api_version),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
            provider_timeout_seconds: env_parse("PROVIDER_TIMEOUT_SECONDS")
                .unwrap_or(defaults.provider_timeout_seconds),
            default_max_call_seconds: env_parse("DEFAULT_MAX_CALL_SECONDS")
                .filter(|&s| s > 0)
                .unwrap_or(defaults.default_max_call_seconds),
            like_items: env_parse("LIKE_ITEMS").unwrap_or(defaults.like_items),
            reconcile_interval_seconds: env_parse("RECONCILE_INTERVAL_SECONDS")
                .filter(|&s| s > 0),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// Load call provider secrets from file or environment.
fn load_call_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [".secrets/calls.json", "../.secrets/calls.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<CallSecrets>(path) {
            tracing::info!(path = %path, "Loaded call provider secrets from file");
            return (
                secrets.api_url.or_else(|| std::env::var("CALL_API_URL").ok()),
                Some(secrets.public_key),
            );
        }
    }

    tracing::debug!("Call provider secrets file not found, using environment variables");
    (
        std::env::var("CALL_API_URL").ok(),
        std::env::var("CALL_API_PUBLIC_KEY").ok(),
    )
}

/// Load identity provider secrets from file or environment.
fn load_identity_secrets() -> (Option<String>, Option<String>, Option<String>) {
    let secret_paths = [".secrets/identity.json", "../.secrets/identity.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<IdentitySecrets>(path) {
            tracing::info!(path = %path, "Loaded identity provider secrets from file");
            return (
                secrets
                    .api_url
                    .or_else(|| std::env::var("IDENTITY_API_URL").ok()),
                Some(secrets.access_token),
                secrets
                    .api_version
                    .or_else(|| std::env::var("IDENTITY_API_VERSION").ok()),
            );
        }
    }

    tracing::debug!("Identity secrets file not found, using environment variables");
    (
        std::env::var("IDENTITY_API_URL").ok(),
        std::env::var("IDENTITY_ACCESS_TOKEN").ok(),
        std::env::var("IDENTITY_API_VERSION").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".into(),
            data_dir: "/data/callboard".into(),
            call_api_url: DEFAULT_CALL_API_URL.into(),
            call_api_public_key: None,
            identity_api_url: DEFAULT_IDENTITY_API_URL.into(),
            identity_access_token: None,
            identity_api_version: callboard_client::DEFAULT_API_VERSION.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            provider_timeout_seconds: 30,
            default_max_call_seconds: DEFAULT_MAX_CALL_SECONDS,
            like_items: 32,
            reconcile_interval_seconds: None,
        }
    }
}
