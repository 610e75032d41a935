//! Achievements and call categories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A one-time badge a user can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Achievement {
    /// First placed call.
    FirstCall,
    /// Third placed call.
    ThreeCalls,
    /// Tenth placed call.
    TenCalls,
    /// Hundredth placed call.
    HundredCalls,
    /// A call placed in the `girls` category.
    CallToGirl,
    /// A call placed in the `guys` category.
    CallToGuy,
    /// Leaderboard position 1.
    Top1,
    /// Leaderboard position within the top 10.
    Top10,
    /// Leaderboard position within the top 100.
    Top100,
}

impl Achievement {
    /// Every achievement, in display order.
    pub const ALL: [Self; 9] = [
        Self::FirstCall,
        Self::ThreeCalls,
        Self::TenCalls,
        Self::HundredCalls,
        Self::CallToGirl,
        Self::CallToGuy,
        Self::Top1,
        Self::Top10,
        Self::Top100,
    ];

    /// Stable code used in storage and on the wire.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FirstCall => "milestone-1",
            Self::ThreeCalls => "milestone-3",
            Self::TenCalls => "milestone-10",
            Self::HundredCalls => "milestone-100",
            Self::CallToGirl => "category-girls",
            Self::CallToGuy => "category-guys",
            Self::Top1 => "rank-1",
            Self::Top10 => "rank-10",
            Self::Top100 => "rank-100",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Achievement {
    type Err = UnknownAchievement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.code() == s)
            .ok_or_else(|| UnknownAchievement(s.to_string()))
    }
}

impl TryFrom<String> for Achievement {
    type Error = UnknownAchievement;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Achievement> for String {
    fn from(a: Achievement) -> Self {
        a.code().to_string()
    }
}

/// An achievement code that is not in the rule table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown achievement: {0}")]
pub struct UnknownAchievement(pub String);

/// A stored unlock record. At most one exists per (user, achievement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementUnlock {
    /// The user who unlocked it.
    pub user_id: UserId,
    /// What was unlocked.
    pub achievement: Achievement,
    /// When it was first unlocked.
    pub obtained_at: DateTime<Utc>,
}

/// Call categories that carry their own achievement.
///
/// Any other category label is accepted for calls but unlocks nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Calls to girls.
    Girls,
    /// Calls to guys.
    Guys,
}

impl Category {
    /// Match a request label, including the labels used by the legacy web client.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "girls" | "Девушкам" => Some(Self::Girls),
            "guys" | "Парням" => Some(Self::Guys),
            _ => None,
        }
    }
}
