//! Goal type classification and the nesting rules derived from it.
//!
//! Hierarchy level and nesting rank come from a single lookup table, so the rules
//! live in one row per type instead of being spread across matches.

use super::ParseGoalTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Planning horizon of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    /// Goal for a single day.
    Daily,
    /// Goal for a week.
    Weekly,
    /// Goal for a month.
    Monthly,
    /// Goal for a year.
    Yearly,
    /// Standalone short-term goal; never nested.
    ShortTerm,
    /// Multi-year goal.
    LongTerm,
    /// Long-term goal created through the hierarchy browser.
    LongTermGoal,
    /// Year goal created through the hierarchy browser.
    YearGoal,
    /// Month goal created through the hierarchy browser.
    MonthGoal,
}

/// Level assigned to types that have no dedicated depth.
pub const DEFAULT_HIERARCHY_LEVEL: u8 = 3;

struct TypeRule {
    goal_type: GoalType,
    name: &'static str,
    level: u8,
    nesting_rank: Option<u8>,
}

const TYPE_TABLE: [TypeRule; 9] = [
    TypeRule {
        goal_type: GoalType::Daily,
        name: "DAILY",
        level: DEFAULT_HIERARCHY_LEVEL,
        nesting_rank: Some(0),
    },
    TypeRule {
        goal_type: GoalType::Weekly,
        name: "WEEKLY",
        level: DEFAULT_HIERARCHY_LEVEL,
        nesting_rank: Some(1),
    },
    TypeRule {
        goal_type: GoalType::Monthly,
        name: "MONTHLY",
        level: 2,
        nesting_rank: Some(2),
    },
    TypeRule {
        goal_type: GoalType::Yearly,
        name: "YEARLY",
        level: 1,
        nesting_rank: Some(3),
    },
    TypeRule {
        goal_type: GoalType::ShortTerm,
        name: "SHORT_TERM",
        level: DEFAULT_HIERARCHY_LEVEL,
        nesting_rank: None,
    },
    TypeRule {
        goal_type: GoalType::LongTerm,
        name: "LONG_TERM",
        level: 0,
        nesting_rank: Some(4),
    },
    TypeRule {
        goal_type: GoalType::LongTermGoal,
        name: "LONG_TERM_GOAL",
        level: 0,
        nesting_rank: Some(4),
    },
    TypeRule {
        goal_type: GoalType::YearGoal,
        name: "YEAR_GOAL",
        level: 1,
        nesting_rank: Some(3),
    },
    TypeRule {
        goal_type: GoalType::MonthGoal,
        name: "MONTH_GOAL",
        level: 2,
        nesting_rank: Some(2),
    },
];

impl GoalType {
    /// Every goal type in storage order.
    pub const ALL: [Self; 9] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::ShortTerm,
        Self::LongTerm,
        Self::LongTermGoal,
        Self::YearGoal,
        Self::MonthGoal,
    ];

    #[expect(
        clippy::indexing_slicing,
        reason = "TYPE_TABLE has one row per variant in declaration order"
    )]
    fn rule(self) -> &'static TypeRule {
        &TYPE_TABLE[self as usize]
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.rule().name
    }

    /// Returns the display depth: 0 for long-term, 1 for year, 2 for month
    /// and 3 for everything else.
    #[must_use]
    pub fn hierarchy_level(self) -> u8 {
        self.rule().level
    }

    /// Reports whether a goal of `child` type may sit directly under a goal
    /// of this type.
    ///
    /// Ranks follow `LONG_TERM > YEARLY > MONTHLY > WEEKLY > DAILY`; a parent
    /// only accepts strictly smaller ranks. `SHORT_TERM` has no rank and
    /// neither accepts nor joins a hierarchy.
    #[must_use]
    pub fn can_have_child(self, child: Self) -> bool {
        match (self.rule().nesting_rank, child.rule().nesting_rank) {
            (Some(parent_rank), Some(child_rank)) => parent_rank > child_rank,
            _ => false,
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GoalType {
    type Error = ParseGoalTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        TYPE_TABLE
            .iter()
            .find(|rule| rule.name == normalized)
            .map(|rule| rule.goal_type)
            .ok_or_else(|| ParseGoalTypeError(value.to_owned()))
    }
}
