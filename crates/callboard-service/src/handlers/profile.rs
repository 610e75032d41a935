//! Profile, coin and achievement handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use callboard_core::{
    Achievement, AchievementUnlock, CoinTransaction, ProfileFlag, UserId, DEFAULT_REWARD_COINS,
    SHARE_BONUS_COINS,
};
use callboard_store::{AchievementStore, CallStatStore, LedgerStore};

use crate::error::ApiError;
use crate::extract::{JsonBody, UserBody, UserPath};
use crate::state::AppState;

/// An unlocked achievement with its date.
#[derive(Debug, Serialize)]
pub struct AchievementResponse {
    /// Achievement code.
    pub achievement: String,
    /// When it was first unlocked (RFC 3339).
    pub date_obtained: String,
}

impl From<&AchievementUnlock> for AchievementResponse {
    fn from(unlock: &AchievementUnlock) -> Self {
        Self {
            achievement: unlock.achievement.code().to_string(),
            date_obtained: unlock.obtained_at.to_rfc3339(),
        }
    }
}

/// User profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// The user.
    pub user_id: UserId,
    /// Coin balance.
    pub coins: i64,
    /// Unlocked achievements.
    pub achievements: Vec<AchievementResponse>,
    /// Whether the share bonus was granted.
    pub has_shared_post: bool,
    /// Whether the user hides their identity on the leaderboard.
    pub hide_me: bool,
    /// Successful calls placed so far.
    pub call_count: u64,
}

/// Get a user's profile. Users without a row get the defaults.
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    UserPath(user_id): UserPath,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.store.get_profile(user_id)?;
    let achievements = state.store.list_for(user_id)?;
    let call_count = state.store.get_call_count(user_id)?;

    Ok(Json(ProfileResponse {
        user_id,
        coins: profile.coins,
        achievements: achievements.iter().map(AchievementResponse::from).collect(),
        has_shared_post: profile.has_shared_post,
        hide_me: profile.hide_me,
        call_count,
    }))
}

/// Achievement date request.
#[derive(Debug, Deserialize)]
pub struct AchievementDateRequest {
    /// Achievement code.
    #[serde(default)]
    pub achievement: Option<String>,
}

/// Achievement date response.
#[derive(Debug, Serialize)]
pub struct AchievementDateResponse {
    /// When the achievement was unlocked, `null` if it was not.
    pub date_obtained: Option<String>,
}

/// Look up when a user unlocked an achievement.
pub async fn get_achievement_date(
    State(state): State<Arc<AppState>>,
    UserPath(user_id): UserPath,
    JsonBody(request): JsonBody<AchievementDateRequest>,
) -> Result<Json<AchievementDateResponse>, ApiError> {
    let code = request
        .achievement
        .ok_or_else(|| ApiError::MissingParameters(vec!["achievement"]))?;
    let achievement: Achievement = code.parse()?;

    let date = state.store.unlocked_at(user_id, achievement)?;

    Ok(Json(AchievementDateResponse {
        date_obtained: date.map(|d| d.to_rfc3339()),
    }))
}

/// Add coins request.
#[derive(Debug, Deserialize)]
pub struct AddCoinsRequest {
    /// The user to credit.
    #[serde(default, rename = "userId")]
    pub user_id: Option<UserId>,
    /// Coins to add (default: 1).
    #[serde(default)]
    pub coins: Option<i64>,
}

/// Coin balance response.
#[derive(Debug, Serialize)]
pub struct CoinsResponse {
    /// Summary.
    pub message: String,
    /// Balance after the operation.
    pub coins: i64,
}

/// Credit coins to a user.
pub async fn add_coins(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<AddCoinsRequest>,
) -> Result<Json<CoinsResponse>, ApiError> {
    let user_id = request
        .user_id
        .ok_or_else(|| ApiError::MissingParameters(vec!["userId"]))?;
    let amount = request.coins.unwrap_or(DEFAULT_REWARD_COINS);

    let coins = state.store.credit(user_id, amount)?;
    tracing::info!(user_id = %user_id, amount, balance = coins, "Coins added");

    Ok(Json(CoinsResponse {
        message: "Coins added".to_string(),
        coins,
    }))
}

/// Grant the one-time bonus for sharing a post.
pub async fn add_coins_for_share(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<UserBody>,
) -> Result<Json<CoinsResponse>, ApiError> {
    let user_id = request.require()?;

    let coins = state.store.claim_share_bonus(user_id, SHARE_BONUS_COINS)?;
    tracing::info!(user_id = %user_id, balance = coins, "Share bonus granted");

    Ok(Json(CoinsResponse {
        message: "Share bonus added".to_string(),
        coins,
    }))
}

/// Hide-me toggle response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HideMeResponse {
    /// The flag's new value.
    pub hide_me: bool,
}

/// Flip whether the user is hidden on the leaderboard.
pub async fn toggle_hide_me(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<UserBody>,
) -> Result<Json<HideMeResponse>, ApiError> {
    let user_id = request.require()?;
    let hide_me = state.store.toggle_flag(user_id, ProfileFlag::HideMe)?;

    Ok(Json(HideMeResponse { hide_me }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Signed amount (positive = credit, negative = debit).
    pub amount: i64,
    /// Transaction kind.
    pub kind: String,
    /// Balance after this transaction.
    pub balance_after: i64,
    /// Description.
    pub description: String,
    /// Timestamp.
    pub created_at: String,
}

impl From<&CoinTransaction> for TransactionResponse {
    fn from(tx: &CoinTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            amount: tx.amount,
            kind: tx.kind.as_str().to_string(),
            balance_after: tx.balance_after,
            description: tx.description.clone(),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List a user's coin journal.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    UserPath(user_id): UserPath,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let transactions = state
        .store
        .list_transactions(user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}
