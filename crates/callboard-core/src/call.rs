//! Call requests and the placement workflow states.

use serde::{Deserialize, Deserializer};

use crate::achievement::Category;
use crate::error::CallError;
use crate::UserId;

/// Call duration cap sent to the provider when the request does not set one.
pub const DEFAULT_MAX_CALL_SECONDS: u32 = 120;

/// An unvalidated call request as received from a client.
///
/// String fields accept JSON strings or numbers. Blank strings count as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallDraft {
    /// Destination phone number.
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    /// Provider campaign the call belongs to.
    #[serde(default, deserialize_with = "lenient_string")]
    pub campaign_id: Option<String>,
    /// Maximum call duration in seconds.
    #[serde(default, deserialize_with = "lenient_string")]
    pub max_call_time: Option<String>,
    /// Text the provider reads out.
    #[serde(default, rename = "audioclip_text", deserialize_with = "lenient_string")]
    pub script: Option<String>,
    /// The paying user.
    #[serde(default, rename = "userId", deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    /// Free-form category label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

impl CallDraft {
    /// Check required fields and build a [`CallRequest`].
    ///
    /// `default_max_call_seconds` is used when `max_call_time` is absent, zero,
    /// or not a number.
    ///
    /// # Errors
    ///
    /// - [`CallError::Validation`] listing every missing field.
    /// - [`CallError::InvalidId`] if the user id is not numeric.
    pub fn validate(self, default_max_call_seconds: u32) -> Result<CallRequest, CallError> {
        let mut missing = Vec::new();
        if self.phone.is_none() {
            missing.push("phone");
        }
        if self.campaign_id.is_none() {
            missing.push("campaign_id");
        }
        if self.script.is_none() {
            missing.push("audioclip_text");
        }
        if self.user_id.is_none() {
            missing.push("userId");
        }
        if self.category.is_none() {
            missing.push("category");
        }

        let (Some(phone), Some(campaign_id), Some(script), Some(user_id), Some(category)) = (
            self.phone,
            self.campaign_id,
            self.script,
            self.user_id,
            self.category,
        ) else {
            return Err(CallError::Validation { missing });
        };

        let max_call_seconds = self
            .max_call_time
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&s| s > 0)
            .unwrap_or(default_max_call_seconds);

        Ok(CallRequest {
            user_id: user_id.parse::<UserId>()?,
            phone,
            campaign_id,
            max_call_seconds,
            script,
            category,
        })
    }
}

/// A validated call request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// The paying user.
    pub user_id: UserId,
    /// Destination phone number.
    pub phone: String,
    /// Provider campaign id.
    pub campaign_id: String,
    /// Maximum call duration in seconds.
    pub max_call_seconds: u32,
    /// Text the provider reads out.
    pub script: String,
    /// Category label as sent by the client.
    pub category: String,
}

impl CallRequest {
    /// The category, if it is one that carries an achievement.
    #[must_use]
    pub fn achievement_category(&self) -> Option<Category> {
        Category::from_label(&self.category)
    }
}

/// States of one call-placement workflow.
///
/// `Failed` is reachable from `Validating`, `BalanceCheck` and `Placing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Checking required fields.
    Validating,
    /// Conditionally debiting the call cost.
    BalanceCheck,
    /// Coin spent, provider not contacted yet.
    Debited,
    /// Provider request in flight.
    Placing,
    /// Provider accepted the call.
    Placed,
    /// Provider failed after the debit.
    ProviderFailed,
    /// Call counter incremented.
    StatsUpdated,
    /// Rules evaluated and unlocks persisted.
    AchievementsEvaluated,
    /// Response delivered.
    Done,
    /// Terminal failure.
    Failed,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
