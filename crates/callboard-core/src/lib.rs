//! Core types and rules for callboard.
//!
//! Users spend coins to have a call placed by an external telephony provider.
//! Each placed call bumps a per-user counter, which feeds a fixed achievement
//! rule table and a call-count leaderboard.
//!
//! - **Identifiers**: `UserId`, `CallId`, `TransactionId`, `ItemId`
//! - **Profiles**: `Profile`, `ProfileFlag`
//! - **Coins**: `CoinTransaction`, `TransactionKind`
//! - **Achievements**: `Achievement`, `AchievementUnlock`, `Category`
//! - **Rules**: `RuleEngine`, `Snapshot`
//! - **Ranking**: `Leaderboard`, `CallStat`
//! - **Calls**: `CallDraft`, `CallRequest`, `CallState`
//!
//! Nothing in this crate performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod achievement;
pub mod call;
pub mod coins;
pub mod error;
pub mod ids;
pub mod leaderboard;
pub mod likes;
pub mod profile;
pub mod rules;

pub use achievement::{Achievement, AchievementUnlock, Category, UnknownAchievement};
pub use call::{CallDraft, CallRequest, CallState, DEFAULT_MAX_CALL_SECONDS};
pub use coins::{CoinTransaction, TransactionKind};
pub use error::{CallError, ProviderFailure, Result};
pub use ids::{CallId, IdError, ItemId, TransactionId, UserId};
pub use leaderboard::{CallStat, Leaderboard, LeaderboardEntry};
pub use likes::{LikeCount, LikeToggle};
pub use profile::{
    Profile, ProfileFlag, CALL_COST_COINS, DEFAULT_COINS, DEFAULT_REWARD_COINS, SHARE_BONUS_COINS,
};
pub use rules::{Predicate, Rule, RuleEngine, Snapshot, RULES};
