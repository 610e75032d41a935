//! Leaderboard handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use callboard_core::{LeaderboardEntry, UserId};
use callboard_store::{AchievementStore, CallStatStore, LedgerStore};

use crate::error::ApiError;
use crate::state::AppState;

/// Entries returned when no limit is given.
const DEFAULT_TOP_USERS: usize = 10;

/// Upper bound on the requested limit.
const MAX_TOP_USERS: usize = 100;

/// Display name of users who hide their identity.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Display name of users the identity provider did not return.
pub const UNKNOWN_NAME: &str = "Unknown user";

/// Top users query parameters.
#[derive(Debug, Deserialize)]
pub struct TopUsersQuery {
    /// Number of entries (default: 10, max: 100).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// A leaderboard row with display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUser {
    /// The user.
    pub user_id: UserId,
    /// Successful calls placed so far.
    pub call_count: u64,
    /// 0-based position.
    pub rank: usize,
    /// Display name.
    pub name: String,
    /// Avatar URL, empty when hidden or unknown.
    pub avatar: String,
    /// Unlocked achievement codes.
    pub achievements: Vec<String>,
    /// Whether the user hides their identity.
    pub hide_me: bool,
}

/// Top users response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUsersResponse {
    /// Rows in rank order.
    pub top_users: Vec<TopUser>,
}

/// Leaderboard with names and avatars.
///
/// Hidden users are never sent to the identity provider. Lookup failures
/// degrade names to placeholders.
pub async fn top_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopUsersQuery>,
) -> Result<Json<TopUsersResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TOP_USERS)
        .clamp(1, MAX_TOP_USERS);

    let entries = state.store.leaderboard()?.top_n(limit);

    let mut hidden = HashMap::with_capacity(entries.len());
    for entry in &entries {
        hidden.insert(
            entry.user_id,
            state.store.get_profile(entry.user_id)?.hide_me,
        );
    }

    let visible: Vec<UserId> = entries
        .iter()
        .map(|e| e.user_id)
        .filter(|id| !hidden.get(id).copied().unwrap_or(false))
        .collect();

    let identities: HashMap<_, _> = match (&state.identity, visible.is_empty()) {
        (Some(identity), false) => identity
            .get_profiles(&visible)
            .await
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect(),
        _ => HashMap::new(),
    };

    let mut top_users = Vec::with_capacity(entries.len());
    for LeaderboardEntry {
        rank,
        user_id,
        call_count,
    } in entries
    {
        let hide_me = hidden.get(&user_id).copied().unwrap_or(false);
        let (name, avatar) = if hide_me {
            (ANONYMOUS_NAME.to_string(), String::new())
        } else if let Some(identity) = identities.get(&user_id) {
            (
                identity.display_name(),
                identity.avatar_url.clone().unwrap_or_default(),
            )
        } else {
            (UNKNOWN_NAME.to_string(), String::new())
        };

        let achievements = state
            .store
            .list_for(user_id)?
            .into_iter()
            .map(|u| u.achievement.code().to_string())
            .collect();

        top_users.push(TopUser {
            user_id,
            call_count,
            rank,
            name,
            avatar,
            achievements,
            hide_me,
        });
    }

    Ok(Json(TopUsersResponse { top_users }))
}
