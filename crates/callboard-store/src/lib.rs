//! `RocksDB` storage layer for callboard.
//!
//! Storage is split into narrow repository traits so the call workflow only sees
//! the operations it needs:
//!
//! - [`LedgerStore`]: coin balance, profile flags, coin journal
//! - [`CallStatStore`]: per-user call counters
//! - [`AchievementStore`]: insert-if-absent unlock records
//! - [`LikeStore`]: audio item votes
//!
//! Every operation is atomic on its own. No operation spans the ledger, the
//! counters and the unlock records.
//!
//! # Example
//!
//! ```no_run
//! use callboard_core::UserId;
//! use callboard_store::{LedgerStore, RocksStore};
//!
//! let store = RocksStore::open("/tmp/callboard-db").unwrap();
//! let user = UserId::new(42);
//!
//! assert_eq!(store.get_balance(user).unwrap(), 3);
//! let balance = store.debit(user, 1).unwrap();
//! assert_eq!(balance, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use callboard_core::{
    Achievement, AchievementUnlock, CallStat, CoinTransaction, ItemId, Leaderboard, LikeCount,
    LikeToggle, Profile, ProfileFlag, UserId,
};
use chrono::{DateTime, Utc};

/// Coin balances and profile flags.
pub trait LedgerStore: Send + Sync {
    /// Current balance, or the default for users without a row.
    ///
    /// Never creates a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_balance(&self, user_id: UserId) -> Result<i64>;

    /// The stored profile, or a default one for users without a row.
    ///
    /// Never creates a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_profile(&self, user_id: UserId) -> Result<Profile>;

    /// Atomically subtract `amount` coins if the balance covers it.
    ///
    /// Returns the new balance. Two concurrent debits can never both succeed
    /// against a balance that covers only one of them.
    ///
    /// # Errors
    ///
    /// - `StoreError::InsufficientCoins` if the balance is below `amount`.
    /// - `StoreError::InvalidAmount` if `amount` is not positive.
    fn debit(&self, user_id: UserId, amount: i64) -> Result<i64>;

    /// Add `amount` coins, creating the row if needed.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidAmount` if `amount` is not positive.
    fn credit(&self, user_id: UserId, amount: i64) -> Result<i64>;

    /// Read a profile flag (`false` for users without a row).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_flag(&self, user_id: UserId, flag: ProfileFlag) -> Result<bool>;

    /// Set a profile flag, creating the row if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn set_flag(&self, user_id: UserId, flag: ProfileFlag, value: bool) -> Result<()>;

    /// Flip a profile flag atomically and return its new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn toggle_flag(&self, user_id: UserId, flag: ProfileFlag) -> Result<bool>;

    /// Grant the one-time share bonus and mark it granted, in one write.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::AlreadyClaimed` if the bonus was granted before.
    /// - `StoreError::InvalidAmount` if `amount` is not positive.
    fn claim_share_bonus(&self, user_id: UserId, amount: i64) -> Result<i64>;

    /// Coin journal for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions(
        &self,
        user_id: UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CoinTransaction>>;
}

/// Per-user counters of successfully placed calls.
pub trait CallStatStore: Send + Sync {
    /// Add one to the user's counter, creating it at 0 first if absent.
    ///
    /// Returns the new count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn increment_call_count(&self, user_id: UserId) -> Result<u64>;

    /// The user's counter, 0 if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_call_count(&self, user_id: UserId) -> Result<u64>;

    /// Every counter row, by count descending then user id ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn all_counts(&self) -> Result<Vec<CallStat>>;

    /// A fresh leaderboard over the current counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn leaderboard(&self) -> Result<Leaderboard> {
        Ok(Leaderboard::from_stats(self.all_counts()?))
    }
}

/// Unlock records, at most one per (user, achievement).
pub trait AchievementStore: Send + Sync {
    /// Whether the user already unlocked `achievement`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_unlocked(&self, user_id: UserId, achievement: Achievement) -> Result<bool>;

    /// Insert an unlock record unless one exists.
    ///
    /// Returns `true` if a record was inserted. An existing record, including
    /// its timestamp, is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn unlock(&self, user_id: UserId, achievement: Achievement, at: DateTime<Utc>)
        -> Result<bool>;

    /// Every unlock of the user, in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_for(&self, user_id: UserId) -> Result<Vec<AchievementUnlock>>;

    /// When the user unlocked `achievement`, if ever.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn unlocked_at(
        &self,
        user_id: UserId,
        achievement: Achievement,
    ) -> Result<Option<DateTime<Utc>>>;
}

/// Votes on audio items.
pub trait LikeStore: Send + Sync {
    /// Create zero-heart counters for items that have none.
    ///
    /// Returns how many items were created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn seed_items(&self, items: &[ItemId]) -> Result<usize>;

    /// Heart counts of every known item, by item id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_likes(&self) -> Result<Vec<LikeCount>>;

    /// Add the user's vote if absent, remove it otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item was never seeded.
    fn toggle_like(&self, item_id: ItemId, user_id: UserId) -> Result<LikeToggle>;

    /// Items the user currently likes, by item id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn liked_items(&self, user_id: UserId) -> Result<Vec<ItemId>>;
}
