//! Request and response types for the external providers.

use callboard_core::{CallId, UserId};
use serde::{Deserialize, Serialize};

/// A call accepted by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CallPlacement {
    /// Identifier assigned by the provider.
    pub call_id: CallId,
    /// The provider's full response body.
    pub payload: serde_json::Value,
}

/// Call details as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallDetail {
    /// The provider's record for the call.
    pub call_info: serde_json::Value,
    /// URL of the call recording, once available.
    pub record_url: Option<String>,
}

/// Parameters identifying a queued call to cancel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CancelCall {
    /// Provider call id.
    pub call_id: String,
    /// Destination phone number of the call.
    pub phone: String,
    /// Provider campaign the call belongs to.
    pub campaign_id: String,
}

/// A user as known to the social identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    /// Provider user id.
    pub id: UserId,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Avatar URL.
    #[serde(default, rename = "photo_100")]
    pub avatar_url: Option<String>,
}

impl UserIdentity {
    /// First and last name joined by a space.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Form body of a call placement.
#[derive(Debug, Serialize)]
pub(crate) struct PlaceCallForm<'a> {
    pub public_key: &'a str,
    pub phone: &'a str,
    pub campaign_id: &'a str,
    pub max_call_time: u32,
    pub text: &'a str,
}

/// Form body of a call cancellation.
#[derive(Debug, Serialize)]
pub(crate) struct RemoveCallForm<'a> {
    pub public_key: &'a str,
    pub call_id: &'a str,
    pub phone: &'a str,
    pub campaign_id: &'a str,
}

/// Envelope of the identity provider's responses.
#[derive(Debug, Deserialize)]
pub(crate) struct IdentityEnvelope {
    #[serde(default)]
    pub response: Option<Vec<UserIdentity>>,
    #[serde(default)]
    pub error: Option<IdentityApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdentityApiError {
    #[serde(default)]
    pub error_msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_display_name() {
        let identity: UserIdentity = serde_json::from_value(serde_json::json!({
            "id": 1,
            "first_name": "Ivan",
            "last_name": "Petrov",
            "photo_100": "https://img.example.com/1.jpg"
        }))
        .unwrap();
        assert_eq!(identity.display_name(), "Ivan Petrov");
        assert_eq!(
            identity.avatar_url.as_deref(),
            Some("https://img.example.com/1.jpg")
        );
    }

    #[test]
    fn identity_without_last_name() {
        let identity: UserIdentity =
            serde_json::from_value(serde_json::json!({"id": "7", "first_name": "Anna"})).unwrap();
        assert_eq!(identity.display_name(), "Anna");
        assert_eq!(identity.avatar_url, None);
    }
}
