//! Audio item like counters.

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Current heart count of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    /// The item.
    pub player_id: ItemId,
    /// Number of users currently liking it.
    pub hearts: u64,
}

/// Result of toggling a user's vote on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    /// Heart count after the toggle.
    pub hearts: u64,
    /// Whether the user likes the item now.
    pub liked: bool,
}
