//! Client error types.

use callboard_core::ProviderFailure;

/// Errors that can occur when talking to an external provider.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status.
    #[error("API error: status {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, parsed as JSON when possible, otherwise as a string.
        payload: serde_json::Value,
    },

    /// A 2xx placement response without a usable `call_id`.
    #[error("call_id not found in provider response")]
    MissingCallId {
        /// The provider's response body.
        payload: serde_json::Value,
    },

    /// A 2xx response whose shape does not match what the endpoint documents.
    #[error("unexpected provider response")]
    UnexpectedResponse {
        /// The provider's response body.
        payload: serde_json::Value,
    },

    /// Response body was not valid JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ClientError> for ProviderFailure {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();
        match err {
            ClientError::Api { status, payload } => Self {
                status: Some(status),
                message,
                payload: Some(payload),
            },
            ClientError::MissingCallId { payload } | ClientError::UnexpectedResponse { payload } => {
                Self {
                    status: None,
                    message,
                    payload: Some(payload),
                }
            }
            ClientError::Http(_) | ClientError::Serialization(_) | ClientError::Configuration(_) => {
                Self::transport(message)
            }
        }
    }
}
