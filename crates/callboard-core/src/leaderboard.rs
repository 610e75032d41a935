//! Leaderboard ranking over call counters.
//!
//! A [`Leaderboard`] is built from a snapshot of every counter row and is
//! never cached: callers rebuild it after each increment so rank checks never
//! see a snapshot older than the increment that triggered them.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// One row of the call-stat store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStat {
    /// The user.
    pub user_id: UserId,
    /// Successful calls placed so far.
    pub call_count: u64,
}

/// A ranked leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 0-based position.
    pub rank: usize,
    /// The user.
    pub user_id: UserId,
    /// Successful calls placed so far.
    pub call_count: u64,
}

/// Users ordered by call count descending, ties by user id ascending.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    ordered: Vec<CallStat>,
}

impl Leaderboard {
    /// Rank a snapshot of counter rows.
    pub fn from_stats(stats: impl IntoIterator<Item = CallStat>) -> Self {
        let mut ordered: Vec<CallStat> = stats.into_iter().collect();
        ordered.sort_unstable_by(|a, b| {
            b.call_count
                .cmp(&a.call_count)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Self { ordered }
    }

    /// 0-based position of `user_id`, or `None` if the user has no counter row.
    #[must_use]
    pub fn rank_of(&self, user_id: UserId) -> Option<usize> {
        self.ordered.iter().position(|s| s.user_id == user_id)
    }

    /// The first `n` entries.
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.entries().take(n).collect()
    }

    /// Iterate over all entries in rank order.
    pub fn entries(&self) -> impl Iterator<Item = LeaderboardEntry> + '_ {
        self.ordered
            .iter()
            .enumerate()
            .map(|(rank, s)| LeaderboardEntry {
                rank,
                user_id: s.user_id,
                call_count: s.call_count,
            })
    }

    /// Number of ranked users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether no user has a counter row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(user: i64, call_count: u64) -> CallStat {
        CallStat {
            user_id: UserId::new(user),
            call_count,
        }
    }

    #[test]
    fn orders_by_count_descending() {
        let board = Leaderboard::from_stats([stat(1, 2), stat(2, 9), stat(3, 5)]);
        assert_eq!(board.rank_of(UserId::new(2)), Some(0));
        assert_eq!(board.rank_of(UserId::new(3)), Some(1));
        assert_eq!(board.rank_of(UserId::new(1)), Some(2));
    }

    #[test]
    fn ties_break_by_user_id() {
        let board = Leaderboard::from_stats([stat(30, 4), stat(10, 4), stat(20, 4)]);
        let users: Vec<_> = board.entries().map(|e| e.user_id.get()).collect();
        assert_eq!(users, vec![10, 20, 30]);
    }

    #[test]
    fn unknown_user_has_no_rank() {
        let board = Leaderboard::from_stats([stat(1, 1)]);
        assert_eq!(board.rank_of(UserId::new(99)), None);
    }

    #[test]
    fn top_n_is_bounded() {
        let board = Leaderboard::from_stats((1..=5).map(|u| stat(u, 10 - u.unsigned_abs())));
        let top = board.top_n(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].user_id, UserId::new(1));
        assert_eq!(top[2].rank, 2);
        assert_eq!(board.top_n(50).len(), 5);
        assert!(Leaderboard::default().top_n(10).is_empty());
    }
}
