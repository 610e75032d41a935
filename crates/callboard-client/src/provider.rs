//! Provider abstractions consumed by the service.

use async_trait::async_trait;
use callboard_core::{CallId, CallRequest, UserId};

use crate::error::ClientError;
use crate::types::{CallDetail, CallPlacement, CancelCall, UserIdentity};

/// Telephony provider that places calls.
#[async_trait]
pub trait CallProvider: Send + Sync {
    /// Queue a call.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx responses, and 2xx responses without
    /// a call id. Never retried.
    async fn place_call(&self, request: &CallRequest) -> Result<CallPlacement, ClientError>;

    /// Look up a call and its recording.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx responses, and bodies that are not a
    /// non-empty array.
    async fn fetch_call_detail(&self, call_id: &CallId) -> Result<CallDetail, ClientError>;

    /// Cancel a queued call and return the provider's acknowledgement.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and non-2xx responses.
    async fn cancel_call(&self, cancel: &CancelCall) -> Result<serde_json::Value, ClientError>;
}

/// Social identity provider resolving user ids to profiles.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Profiles of the given users, in provider order.
    ///
    /// Best-effort: any failure yields an empty list.
    async fn get_profiles(&self, user_ids: &[UserId]) -> Vec<UserIdentity>;
}
