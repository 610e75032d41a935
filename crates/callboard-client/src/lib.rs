//! Outbound HTTP clients for callboard.
//!
//! Two third-party services sit behind this crate:
//!
//! - the **call provider**, which places phone calls and reports on them
//!   ([`CallApiClient`], behind the [`CallProvider`] trait);
//! - the **social identity provider**, which resolves user ids to display
//!   names and avatars ([`SocialIdentityClient`], behind [`IdentityProvider`]).
//!
//! The service depends only on the traits.
//!
//! # Example
//!
//! ```no_run
//! use callboard_client::{CallApiClient, CallProvider, ClientOptions};
//! use callboard_core::CallId;
//!
//! # async fn example() -> Result<(), callboard_client::ClientError> {
//! let client = CallApiClient::new(
//!     "https://calls.example.com/api/v1",
//!     "public-key",
//!     ClientOptions::default(),
//! )?;
//!
//! let detail = client.fetch_call_detail(&CallId::new("123")).await?;
//! println!("recording: {:?}", detail.record_url);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod calls;
mod error;
mod identity;
mod provider;
mod types;

pub use calls::CallApiClient;
pub use error::ClientError;
pub use identity::{SocialIdentityClient, DEFAULT_API_VERSION};
pub use provider::{CallProvider, IdentityProvider};
pub use types::*;

use std::time::Duration;

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!("callboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a request timeout.
    #[must_use]
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            ..Self::default()
        }
    }

    fn build_http_client(&self) -> Result<reqwest::Client, ClientError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))
    }
}
