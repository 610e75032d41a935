//! Key encoding utilities for `RocksDB`.
//!
//! User ids are encoded with [`UserId::to_bytes`], so iterating a column family
//! keyed by user visits users in ascending id order.

use callboard_core::{Achievement, IdError, ItemId, TransactionId, UserId};

/// Width of an encoded user id.
pub const USER_KEY_LEN: usize = 8;

/// Key of a profile row.
#[must_use]
pub fn profile_key(user_id: UserId) -> Vec<u8> {
    user_id.to_bytes().to_vec()
}

/// Key of a call counter row.
#[must_use]
pub fn call_stat_key(user_id: UserId) -> Vec<u8> {
    user_id.to_bytes().to_vec()
}

/// Key of an unlock record.
///
/// Format: `user_id (8 bytes) || achievement code (utf-8)`
#[must_use]
pub fn achievement_key(user_id: UserId, achievement: Achievement) -> Vec<u8> {
    let code = achievement.code().as_bytes();
    let mut key = Vec::with_capacity(USER_KEY_LEN + code.len());
    key.extend_from_slice(&user_id.to_bytes());
    key.extend_from_slice(code);
    key
}

/// Prefix shared by every key scoped to one user.
#[must_use]
pub fn user_prefix(user_id: UserId) -> Vec<u8> {
    user_id.to_bytes().to_vec()
}

/// Key of a coin journal entry.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a user-transaction index key.
///
/// Format: `user_id (8 bytes) || transaction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, transactions for a user will be sorted by time.
#[must_use]
pub fn user_transaction_key(user_id: UserId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(USER_KEY_LEN + 16);
    key.extend_from_slice(&user_id.to_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Extract the transaction ID from a user-transaction index key.
///
/// # Errors
///
/// Returns an error if the key is not 24 bytes long.
pub fn extract_transaction_id(key: &[u8]) -> Result<TransactionId, IdError> {
    TransactionId::from_bytes(key.get(USER_KEY_LEN..).ok_or(IdError::InvalidKey)?)
}

/// Key of an item's heart counter.
#[must_use]
pub fn like_key(item_id: ItemId) -> Vec<u8> {
    item_id.to_bytes().to_vec()
}

/// Key of one user's vote on one item.
///
/// Format: `user_id (8 bytes) || item_id (4 bytes)`
#[must_use]
pub fn user_like_key(user_id: UserId, item_id: ItemId) -> Vec<u8> {
    let mut key = Vec::with_capacity(USER_KEY_LEN + 4);
    key.extend_from_slice(&user_id.to_bytes());
    key.extend_from_slice(&item_id.to_bytes());
    key
}

/// Extract the item from a user-like key.
///
/// # Errors
///
/// Returns an error if the key is not 12 bytes long.
pub fn extract_item_id(key: &[u8]) -> Result<ItemId, IdError> {
    ItemId::from_bytes(key.get(USER_KEY_LEN..).ok_or(IdError::InvalidKey)?)
}
