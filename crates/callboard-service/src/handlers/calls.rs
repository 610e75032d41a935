//! Call provider handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use callboard_client::CancelCall;
use callboard_core::{CallDraft, CallId};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// Place a call on behalf of a user.
///
/// Returns the provider's response body unchanged.
pub async fn place_call(
    State(state): State<Arc<AppState>>,
    JsonBody(draft): JsonBody<CallDraft>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let placed = state.orchestrator()?.place_call(draft).await?;
    Ok(Json(placed.payload))
}

/// Cancel call request. Fields accept JSON strings or numbers.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveCallRequest {
    /// Provider call id.
    #[serde(default)]
    pub call_id: serde_json::Value,
    /// Destination phone number.
    #[serde(default)]
    pub phone: serde_json::Value,
    /// Provider campaign id.
    #[serde(default)]
    pub campaign_id: serde_json::Value,
}

impl RemoveCallRequest {
    fn validate(&self) -> Result<CancelCall, ApiError> {
        match (text(&self.call_id), text(&self.phone), text(&self.campaign_id)) {
            (Some(call_id), Some(phone), Some(campaign_id)) => Ok(CancelCall {
                call_id,
                phone,
                campaign_id,
            }),
            (call_id, phone, campaign_id) => {
                let missing = [
                    ("call_id", call_id.is_none()),
                    ("phone", phone.is_none()),
                    ("campaign_id", campaign_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ApiError::MissingParameters(missing))
            }
        }
    }
}

fn text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Cancel a queued call.
pub async fn remove_call(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RemoveCallRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cancel = request.validate()?;
    let ack = state.call_provider()?.cancel_call(&cancel).await?;

    tracing::info!(call_id = %cancel.call_id, "Call cancelled");
    Ok(Json(ack))
}

/// Call detail response.
#[derive(Debug, Serialize)]
pub struct CallInfoResponse {
    /// Summary.
    pub message: String,
    /// The provider's record for the call.
    pub call_info: serde_json::Value,
    /// Recording URL, once available.
    pub record_url: Option<String>,
}

/// Fetch a call's details and recording URL.
pub async fn get_call_info(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> Result<Json<CallInfoResponse>, ApiError> {
    let call_id = call_id.trim();
    if call_id.is_empty() {
        return Err(ApiError::MissingParameters(vec!["call_id"]));
    }

    let detail = state
        .call_provider()?
        .fetch_call_detail(&CallId::new(call_id))
        .await?;

    Ok(Json(CallInfoResponse {
        message: "Call info retrieved".to_string(),
        call_info: detail.call_info,
        record_url: detail.record_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remove_call_accepts_numbers() {
        let request: RemoveCallRequest =
            serde_json::from_value(json!({"call_id": 5, "phone": "7999", "campaign_id": 12}))
                .unwrap();
        let cancel = request.validate().unwrap();
        assert_eq!(cancel.call_id, "5");
        assert_eq!(cancel.campaign_id, "12");
    }

    #[test]
    fn remove_call_lists_missing_fields() {
        let request: RemoveCallRequest = serde_json::from_value(json!({"phone": " "})).unwrap();
        match request.validate() {
            Err(ApiError::MissingParameters(missing)) => {
                assert_eq!(missing, vec!["call_id", "phone", "campaign_id"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
