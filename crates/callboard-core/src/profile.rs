//! Profile types for callboard.
//!
//! A profile row holds the coin balance and the per-user flags. Rows are created
//! lazily the first time a write touches the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

// ============================================================================
// Constants
// ============================================================================

/// Coins a user owns before any row exists.
pub const DEFAULT_COINS: i64 = 3;

/// Coins charged for one placed call.
pub const CALL_COST_COINS: i64 = 1;

/// Coins granted once for sharing a post.
pub const SHARE_BONUS_COINS: i64 = 1;

/// Default coins granted by the add-coins operation when no amount is given.
pub const DEFAULT_REWARD_COINS: i64 = 1;

/// A stored profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The user this row belongs to.
    pub user_id: UserId,

    /// Spendable coin balance. Never negative.
    pub coins: i64,

    /// Whether the one-time share bonus was already granted.
    pub has_shared_post: bool,

    /// Whether the user is anonymised on the leaderboard.
    pub hide_me: bool,

    /// When the row was first written.
    pub created_at: DateTime<Utc>,

    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The profile a user has before anything was stored for them.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            coins: DEFAULT_COINS,
            has_shared_post: false,
            hide_me: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the balance covers `amount` coins.
    #[must_use]
    pub fn can_afford(&self, amount: i64) -> bool {
        self.coins >= amount
    }

    /// Read a boolean flag.
    #[must_use]
    pub fn flag(&self, flag: ProfileFlag) -> bool {
        match flag {
            ProfileFlag::HasSharedPost => self.has_shared_post,
            ProfileFlag::HideMe => self.hide_me,
        }
    }

    /// Set a boolean flag.
    pub fn set_flag(&mut self, flag: ProfileFlag, value: bool) {
        match flag {
            ProfileFlag::HasSharedPost => self.has_shared_post = value,
            ProfileFlag::HideMe => self.hide_me = value,
        }
    }
}

/// Boolean attributes stored on the profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileFlag {
    /// The share bonus has been granted.
    HasSharedPost,
    /// Hide name and avatar on the leaderboard.
    HideMe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_has_default_coins() {
        let profile = Profile::new(UserId::new(7));
        assert_eq!(profile.coins, DEFAULT_COINS);
        assert!(!profile.has_shared_post);
        assert!(!profile.hide_me);
    }

    #[test]
    fn affordability() {
        let mut profile = Profile::new(UserId::new(7));
        profile.coins = 1;
        assert!(profile.can_afford(CALL_COST_COINS));
        profile.coins = 0;
        assert!(!profile.can_afford(CALL_COST_COINS));
    }

    #[test]
    fn flags_are_independent() {
        let mut profile = Profile::new(UserId::new(7));
        profile.set_flag(ProfileFlag::HideMe, true);
        assert!(profile.flag(ProfileFlag::HideMe));
        assert!(!profile.flag(ProfileFlag::HasSharedPost));
    }
}
