//! Call placement workflow.
//!
//! A placement is a short saga over independent stores:
//!
//! 1. validate the request
//! 2. debit the call cost (atomic compare-and-decrement)
//! 3. ask the provider to place the call
//! 4. increment the caller's counter
//! 5. evaluate rules against a fresh leaderboard and persist unlocks
//!
//! Failures in steps 1-3 abort the request. The debit is never refunded, so a
//! failed provider call still costs a coin. Failures in steps 4-5 are logged
//! and swallowed because the call has already been placed. No store lock is
//! held while the provider request is in flight.

use std::sync::Arc;

use callboard_client::{CallPlacement, CallProvider};
use callboard_core::{Achievement, CallDraft, CallError, CallId, CallRequest, CallState, UserId};
use callboard_store::{CallStatStore, LedgerStore, StoreError};

use crate::awards::AchievementAwarder;

/// A call the provider accepted.
#[derive(Debug, Clone)]
pub struct PlacedCall {
    /// Provider call id.
    pub call_id: CallId,
    /// The provider's response body, returned to the client unchanged.
    pub payload: serde_json::Value,
    /// Balance left after the debit.
    pub balance: i64,
    /// Counter after the increment, `None` if the increment failed.
    pub call_count: Option<u64>,
    /// Achievements unlocked by this call.
    pub unlocked: Vec<Achievement>,
}

/// Coordinates ledger, provider, counters and achievements for one call.
#[derive(Clone)]
pub struct CallOrchestrator {
    ledger: Arc<dyn LedgerStore>,
    stats: Arc<dyn CallStatStore>,
    provider: Arc<dyn CallProvider>,
    awarder: AchievementAwarder,
    call_cost: i64,
    default_max_call_seconds: u32,
}

impl CallOrchestrator {
    /// Create an orchestrator.
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        stats: Arc<dyn CallStatStore>,
        provider: Arc<dyn CallProvider>,
        awarder: AchievementAwarder,
    ) -> Self {
        Self {
            ledger,
            stats,
            provider,
            awarder,
            call_cost: callboard_core::CALL_COST_COINS,
            default_max_call_seconds: callboard_core::DEFAULT_MAX_CALL_SECONDS,
        }
    }

    /// Set the duration cap used when a request omits `max_call_time`.
    #[must_use]
    pub fn with_default_max_call_seconds(mut self, seconds: u32) -> Self {
        self.default_max_call_seconds = seconds;
        self
    }

    /// Validate a raw request and run the placement workflow.
    ///
    /// # Errors
    ///
    /// - [`CallError::Validation`] / [`CallError::InvalidId`]: nothing changed.
    /// - [`CallError::InsufficientFunds`]: nothing changed.
    /// - [`CallError::Store`]: the debit could not be performed.
    /// - [`CallError::Provider`]: the coin was spent, nothing else changed.
    pub async fn place_call(&self, draft: CallDraft) -> Result<PlacedCall, CallError> {
        transition(None, CallState::Validating);
        let request = draft
            .validate(self.default_max_call_seconds)
            .map_err(|e| {
                tracing::warn!(error = %e, state = ?CallState::Failed, "Call request rejected");
                e
            })?;

        self.place(request).await
    }

    /// Run the workflow for an already validated request.
    ///
    /// # Errors
    ///
    /// Same as [`CallOrchestrator::place_call`], minus validation.
    pub async fn place(&self, request: CallRequest) -> Result<PlacedCall, CallError> {
        let user_id = request.user_id;

        transition(Some(user_id), CallState::BalanceCheck);
        let balance = self.debit(user_id)?;
        transition(Some(user_id), CallState::Debited);

        transition(Some(user_id), CallState::Placing);
        let CallPlacement { call_id, payload } = match self.provider.place_call(&request).await {
            Ok(placement) => placement,
            Err(e) => {
                transition(Some(user_id), CallState::ProviderFailed);
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    balance,
                    state = ?CallState::Failed,
                    "Call provider failed after debit"
                );
                return Err(CallError::Provider(e.into()));
            }
        };
        tracing::info!(user_id = %user_id, call_id = %call_id, balance, "Call placed");
        transition(Some(user_id), CallState::Placed);

        let (call_count, unlocked) = self.record_success(&request);

        transition(Some(user_id), CallState::Done);
        Ok(PlacedCall {
            call_id,
            payload,
            balance,
            call_count,
            unlocked,
        })
    }

    fn debit(&self, user_id: UserId) -> Result<i64, CallError> {
        match self.ledger.debit(user_id, self.call_cost) {
            Ok(balance) => Ok(balance),
            Err(StoreError::InsufficientCoins { balance, .. }) => {
                tracing::warn!(user_id = %user_id, balance, state = ?CallState::Failed, "Not enough coins for a call");
                Err(CallError::InsufficientFunds { balance })
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, state = ?CallState::Failed, "Debit failed");
                Err(CallError::Store(e.to_string()))
            }
        }
    }

    /// Post-placement bookkeeping. Never fails the request.
    fn record_success(&self, request: &CallRequest) -> (Option<u64>, Vec<Achievement>) {
        let user_id = request.user_id;

        let call_count = match self.stats.increment_call_count(user_id) {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to record placed call");
                return (None, Vec::new());
            }
        };
        transition(Some(user_id), CallState::StatsUpdated);

        let unlocked =
            self.awarder
                .evaluate_and_award(user_id, call_count, request.achievement_category());
        transition(Some(user_id), CallState::AchievementsEvaluated);

        (Some(call_count), unlocked)
    }
}

fn transition(user_id: Option<UserId>, state: CallState) {
    match user_id {
        Some(user_id) => tracing::debug!(user_id = %user_id, state = ?state, "Call workflow"),
        None => tracing::debug!(state = ?state, "Call workflow"),
    }
}
