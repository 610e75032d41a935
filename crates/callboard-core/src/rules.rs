//! Achievement rule evaluation.
//!
//! Rules are a fixed table compiled into the binary. Evaluation is pure: it
//! reports every achievement whose predicate holds for a snapshot and leaves
//! deduplication to the achievement store's insert-if-absent semantics.

use crate::achievement::{Achievement, Category};

/// The facts a rule can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Call count after the increment that triggered evaluation.
    pub call_count: u64,
    /// Category of the triggering call, if it is one that carries an achievement.
    pub category: Option<Category>,
    /// 0-based leaderboard position, `None` if the user has no counter row.
    pub rank: Option<usize>,
}

/// A condition over a [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Call count equals this value exactly. A counter that skips the value
    /// never unlocks it.
    CallCountEquals(u64),
    /// The call was placed in this category.
    InCategory(Category),
    /// Rank is strictly below this value.
    RankBelow(usize),
}

impl Predicate {
    /// Check the predicate against a snapshot.
    #[must_use]
    pub fn holds(self, snapshot: &Snapshot) -> bool {
        match self {
            Self::CallCountEquals(n) => snapshot.call_count == n,
            Self::InCategory(category) => snapshot.category == Some(category),
            Self::RankBelow(limit) => snapshot.rank.is_some_and(|rank| rank < limit),
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Unlocked when the predicate holds.
    pub achievement: Achievement,
    /// The condition.
    pub predicate: Predicate,
}

/// The rule table.
pub const RULES: &[Rule] = &[
    Rule {
        achievement: Achievement::FirstCall,
        predicate: Predicate::CallCountEquals(1),
    },
    Rule {
        achievement: Achievement::ThreeCalls,
        predicate: Predicate::CallCountEquals(3),
    },
    Rule {
        achievement: Achievement::TenCalls,
        predicate: Predicate::CallCountEquals(10),
    },
    Rule {
        achievement: Achievement::HundredCalls,
        predicate: Predicate::CallCountEquals(100),
    },
    Rule {
        achievement: Achievement::CallToGirl,
        predicate: Predicate::InCategory(Category::Girls),
    },
    Rule {
        achievement: Achievement::CallToGuy,
        predicate: Predicate::InCategory(Category::Guys),
    },
    Rule {
        achievement: Achievement::Top1,
        predicate: Predicate::RankBelow(1),
    },
    Rule {
        achievement: Achievement::Top10,
        predicate: Predicate::RankBelow(10),
    },
    Rule {
        achievement: Achievement::Top100,
        predicate: Predicate::RankBelow(100),
    },
];

/// Stateless evaluator over a rule table.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    rules: &'static [Rule],
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self { rules: RULES }
    }
}

impl RuleEngine {
    /// Create an engine over a custom table.
    #[must_use]
    pub const fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// Achievements whose predicates hold, in table order.
    #[must_use]
    pub fn evaluate(&self, snapshot: &Snapshot) -> Vec<Achievement> {
        self.rules
            .iter()
            .filter(|rule| rule.predicate.holds(snapshot))
            .map(|rule| rule.achievement)
            .collect()
    }
}
