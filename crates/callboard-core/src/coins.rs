//! Coin journal entries.
//!
//! Every balance change writes one entry in the same atomic write as the
//! balance itself, so the journal always explains the current balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TransactionId, UserId};

/// A single change to a user's coin balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinTransaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The user whose balance was affected.
    pub user_id: UserId,

    /// Signed change. Positive = credit, negative = debit.
    pub amount: i64,

    /// What caused the change.
    pub kind: TransactionKind,

    /// Balance after this transaction.
    pub balance_after: i64,

    /// Human-readable description.
    pub description: String,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl CoinTransaction {
    fn new(
        user_id: UserId,
        amount: i64,
        kind: TransactionKind,
        balance_after: i64,
        description: String,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            kind,
            balance_after,
            description,
            created_at: Utc::now(),
        }
    }

    /// Coins spent on placing a call.
    #[must_use]
    pub fn call_charge(user_id: UserId, amount: i64, balance_after: i64) -> Self {
        Self::new(
            user_id,
            -amount.abs(),
            TransactionKind::CallCharge,
            balance_after,
            "Call placement".into(),
        )
    }

    /// Coins granted by the add-coins operation (ad views, promotions).
    #[must_use]
    pub fn reward(user_id: UserId, amount: i64, balance_after: i64) -> Self {
        Self::new(
            user_id,
            amount,
            TransactionKind::Reward,
            balance_after,
            format!("Reward of {amount} coins"),
        )
    }

    /// The one-time bonus for sharing a post.
    #[must_use]
    pub fn share_bonus(user_id: UserId, amount: i64, balance_after: i64) -> Self {
        Self::new(
            user_id,
            amount,
            TransactionKind::ShareBonus,
            balance_after,
            "Share bonus".into(),
        )
    }
}

/// Type of coin transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Coins spent on a call.
    CallCharge,

    /// Coins granted explicitly.
    Reward,

    /// One-time share bonus.
    ShareBonus,
}

impl TransactionKind {
    /// Wire name, as used in JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CallCharge => "call_charge",
            Self::Reward => "reward",
            Self::ShareBonus => "share_bonus",
        }
    }

    /// Check if this kind adds coins.
    #[must_use]
    pub const fn is_credit(self) -> bool {
        matches!(self, Self::Reward | Self::ShareBonus)
    }
}
