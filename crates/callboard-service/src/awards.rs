//! Achievement awarding.
//!
//! Turns counter snapshots into persisted unlocks. Used inline after every
//! placed call and by the periodic reconciliation pass, which repairs unlocks
//! lost when the process died between the counter update and the unlock write.

use std::sync::Arc;

use chrono::Utc;

use callboard_core::{Achievement, Category, RuleEngine, Snapshot, UserId};
use callboard_store::{AchievementStore, CallStatStore, StoreError};

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Users whose counters were re-evaluated.
    pub users_checked: usize,
    /// Unlock records that were missing and have been written.
    pub unlocks_added: usize,
}

/// Evaluates the rule table and persists the resulting unlocks.
#[derive(Clone)]
pub struct AchievementAwarder {
    stats: Arc<dyn CallStatStore>,
    achievements: Arc<dyn AchievementStore>,
    rules: RuleEngine,
}

impl AchievementAwarder {
    /// Create an awarder over the default rule table.
    pub fn new(stats: Arc<dyn CallStatStore>, achievements: Arc<dyn AchievementStore>) -> Self {
        Self {
            stats,
            achievements,
            rules: RuleEngine::default(),
        }
    }

    /// Evaluate rules for a call that just brought the user to `call_count`.
    ///
    /// Rank comes from a leaderboard rebuilt after the increment. Returns the
    /// achievements unlocked by this pass. Store failures are logged and the
    /// affected unlocks skipped.
    pub fn evaluate_and_award(
        &self,
        user_id: UserId,
        call_count: u64,
        category: Option<Category>,
    ) -> Vec<Achievement> {
        let rank = match self.stats.leaderboard() {
            Ok(board) => board.rank_of(user_id),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to rank user; skipping rank rules");
                None
            }
        };

        let snapshot = Snapshot {
            call_count,
            category,
            rank,
        };
        self.award(user_id, &snapshot)
    }

    /// Re-evaluate milestone and rank rules for every user with a counter.
    ///
    /// The category of past calls is not stored, so category rules are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the counters cannot be read.
    pub fn reconcile(&self) -> Result<ReconcileReport, StoreError> {
        let board = self.stats.leaderboard()?;
        let mut report = ReconcileReport::default();

        for entry in board.entries() {
            let snapshot = Snapshot {
                call_count: entry.call_count,
                category: None,
                rank: Some(entry.rank),
            };
            report.users_checked += 1;
            report.unlocks_added += self.award(entry.user_id, &snapshot).len();
        }

        tracing::info!(
            users_checked = report.users_checked,
            unlocks_added = report.unlocks_added,
            "Achievement reconciliation finished"
        );
        Ok(report)
    }

    fn award(&self, user_id: UserId, snapshot: &Snapshot) -> Vec<Achievement> {
        let now = Utc::now();
        let mut unlocked = Vec::new();

        for achievement in self.rules.evaluate(snapshot) {
            match self.achievements.unlock(user_id, achievement, now) {
                Ok(true) => {
                    tracing::info!(user_id = %user_id, achievement = %achievement.code(), "Achievement unlocked");
                    unlocked.push(achievement);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        user_id = %user_id,
                        achievement = %achievement.code(),
                        error = %e,
                        "Failed to persist achievement"
                    );
                }
            }
        }

        unlocked
    }
}
