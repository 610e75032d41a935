//! Error types for the call workflow.

use crate::ids::IdError;

/// Result type for call workflow operations.
pub type Result<T> = std::result::Result<T, CallError>;

/// Failures of a call-placement request.
///
/// Only [`CallError::Provider`] and [`CallError::Store`] can occur after the coin
/// was debited. Debits are never rolled back.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Required fields were missing or malformed. No side effects happened.
    #[error("missing parameters: {}", missing.join(", "))]
    Validation {
        /// Names of the missing request fields, in request order.
        missing: Vec<&'static str>,
    },

    /// The user has no coins left. No side effects happened.
    #[error("insufficient coins: balance={balance}")]
    InsufficientFunds {
        /// Balance observed at the time of the debit attempt.
        balance: i64,
    },

    /// The call provider failed or answered with an unexpected shape.
    #[error("call provider error: {0}")]
    Provider(ProviderFailure),

    /// The persistence layer failed before the call was placed.
    #[error("storage error: {0}")]
    Store(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}

/// What the call provider reported when it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    /// HTTP status returned by the provider, if a response was received.
    pub status: Option<u16>,
    /// Human-readable summary.
    pub message: String,
    /// The provider's raw response body, when available.
    pub payload: Option<serde_json::Value>,
}

impl ProviderFailure {
    /// A failure without a provider response (transport error, timeout).
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            payload: None,
        }
    }
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}
