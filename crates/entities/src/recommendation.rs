//! Recommendation entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ScoreTier;

/// The rule that produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Low dimension score.
    Foundation,
    /// Medium dimension score.
    Optimization,
    /// High dimension score.
    Advanced,
    /// Weakest habit needs attention.
    StrengthenHabit,
    /// A category has no habits.
    BalanceHabits,
    /// No check-ins recorded yet.
    StartCheckins,
    /// Recent energy is low.
    EnergyManagement,
    /// Check-ins have gone stale.
    CheckinConsistency,
    /// No self-assessment available.
    CompleteAssessment,
    /// Entered by hand or seeded.
    Custom,
}

impl RecommendationKind {
    /// Returns the score tier for dimension-based kinds.
    pub fn tier(&self) -> Option<ScoreTier> {
        match self {
            Self::Foundation => Some(ScoreTier::Foundation),
            Self::Optimization => Some(ScoreTier::Optimization),
            Self::Advanced => Some(ScoreTier::Advanced),
            _ => None,
        }
    }

    /// Returns the kind produced for a score tier.
    pub fn for_tier(tier: ScoreTier) -> Self {
        match tier {
            ScoreTier::Foundation => Self::Foundation,
            ScoreTier::Optimization => Self::Optimization,
            ScoreTier::Advanced => Self::Advanced,
        }
    }

    /// Storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Optimization => "optimization",
            Self::Advanced => "advanced",
            Self::StrengthenHabit => "strengthen_habit",
            Self::BalanceHabits => "balance_habits",
            Self::StartCheckins => "start_checkins",
            Self::EnergyManagement => "energy_management",
            Self::CheckinConsistency => "checkin_consistency",
            Self::CompleteAssessment => "complete_assessment",
            Self::Custom => "custom",
        }
    }

    /// Parses a storage name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "foundation" => Some(Self::Foundation),
            "optimization" => Some(Self::Optimization),
            "advanced" => Some(Self::Advanced),
            "strengthen_habit" => Some(Self::StrengthenHabit),
            "balance_habits" => Some(Self::BalanceHabits),
            "start_checkins" => Some(Self::StartCheckins),
            "energy_management" => Some(Self::EnergyManagement),
            "checkin_consistency" => Some(Self::CheckinConsistency),
            "complete_assessment" => Some(Self::CompleteAssessment),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// A stored suggestion shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Headline.
    pub title: String,
    /// Explanation.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Expected impact, e.g. "+25% sleep quality".
    pub impact: String,
    /// Lower is more urgent.
    pub priority: i32,
    /// Producing rule.
    pub kind: RecommendationKind,
    /// False once dismissed or superseded.
    pub is_active: bool,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    /// Creates a new active recommendation.
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        impact: impl Into<String>,
        priority: i32,
        kind: RecommendationKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: description.into(),
            category: category.into(),
            impact: impact.into(),
            priority,
            kind,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
