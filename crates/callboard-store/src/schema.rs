//! Column families.
//!
//! The profile side (`profiles`, `coin_transactions*`, `achievements`) and the
//! stats side (`call_stats`) are never written in the same batch.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Profile rows (balance and flags), keyed by `user_id`.
    pub const PROFILES: &str = "profiles";

    /// Coin journal, keyed by `transaction_id` (ULID).
    pub const COIN_TRANSACTIONS: &str = "coin_transactions";

    /// Index: coin journal by user, keyed by `user_id || transaction_id`.
    /// Value is empty (index only).
    pub const COIN_TRANSACTIONS_BY_USER: &str = "coin_transactions_by_user";

    /// Call counters, keyed by `user_id`.
    pub const CALL_STATS: &str = "call_stats";

    /// Unlock records, keyed by `user_id || achievement code`.
    pub const ACHIEVEMENTS: &str = "achievements";

    /// Heart counts, keyed by `item_id`.
    pub const LIKES: &str = "likes";

    /// One vote per user per item, keyed by `user_id || item_id`. Empty value.
    pub const USER_LIKES: &str = "user_likes";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::PROFILES,
        cf::COIN_TRANSACTIONS,
        cf::COIN_TRANSACTIONS_BY_USER,
        cf::CALL_STATS,
        cf::ACHIEVEMENTS,
        cf::LIKES,
        cf::USER_LIKES,
    ]
}
