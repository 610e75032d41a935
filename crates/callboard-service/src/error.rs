//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use callboard_client::ClientError;
use callboard_core::{CallError, IdError, ProviderFailure, UnknownAchievement, CALL_COST_COINS};
use callboard_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Required request fields were absent or blank.
    #[error("Missing parameters: {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),

    /// Conflict - the operation was already performed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Not enough coins for the operation.
    #[error("insufficient coins: balance={balance}, required={required}")]
    InsufficientCoins {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// An external service is not configured.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// The call provider failed or answered unexpectedly.
    #[error("call provider error: {0}")]
    Provider(ProviderFailure),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::MissingParameters(missing) => (
                StatusCode::BAD_REQUEST,
                "missing_parameters",
                self.to_string(),
                Some(serde_json::json!({ "missing": missing })),
            ),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::InsufficientCoins { balance, required } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_coins",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
                None,
            ),
            Self::Provider(failure) => (
                provider_status(failure.status),
                "provider_error",
                failure.message.clone(),
                failure.payload.clone(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// The provider's own error status when it is a 4xx/5xx, otherwise 502.
fn provider_status(status: Option<u16>) -> StatusCode {
    status
        .filter(|s| (400..600).contains(s))
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound(format!("{entity} not found: {id}")),
            StoreError::InsufficientCoins { balance, required } => {
                Self::InsufficientCoins { balance, required }
            }
            StoreError::AlreadyClaimed { user_id } => {
                Self::Conflict(format!("share bonus already claimed by user {user_id}"))
            }
            StoreError::InvalidAmount(amount) => {
                Self::BadRequest(format!("amount must be positive, got {amount}"))
            }
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<CallError> for ApiError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Validation { missing } => Self::MissingParameters(missing),
            CallError::InsufficientFunds { balance } => Self::InsufficientCoins {
                balance,
                required: CALL_COST_COINS,
            },
            CallError::Provider(failure) => Self::Provider(failure),
            CallError::Store(msg) => Self::Internal(msg),
            CallError::InvalidId(e) => Self::BadRequest(e.to_string()),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        Self::Provider(err.into())
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<UnknownAchievement> for ApiError {
    fn from(err: UnknownAchievement) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_passthrough() {
        assert_eq!(provider_status(Some(422)), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider_status(Some(503)), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(provider_status(Some(200)), StatusCode::BAD_GATEWAY);
        assert_eq!(provider_status(None), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn call_errors_map_to_client_statuses() {
        let missing = ApiError::from(CallError::Validation {
            missing: vec!["phone", "category"],
        });
        assert_eq!(missing.to_string(), "Missing parameters: phone, category");
        assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);

        let broke = ApiError::from(CallError::InsufficientFunds { balance: 0 });
        assert_eq!(broke.into_response().status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn duplicate_bonus_is_conflict() {
        let err = ApiError::from(StoreError::AlreadyClaimed {
            user_id: "1".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
