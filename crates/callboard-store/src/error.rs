//! Error types for callboard storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Its key.
        id: String,
    },

    /// The balance does not cover the debit. Nothing was written.
    #[error("insufficient coins: balance={balance}, required={required}")]
    InsufficientCoins {
        /// Balance at the time of the attempt.
        balance: i64,
        /// Requested debit.
        required: i64,
    },

    /// Coin amounts must be positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// The one-time share bonus was already granted. Nothing was written.
    #[error("share bonus already claimed by user {user_id}")]
    AlreadyClaimed {
        /// The user.
        user_id: String,
    },
}

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}
