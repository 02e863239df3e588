//! Blueprint entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight of a focus area, clamped to `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct FocusPriority(u8);

impl FocusPriority {
    /// Lowest weight.
    pub const MIN: u8 = 1;
    /// Highest weight.
    pub const MAX: u8 = 5;

    /// Creates a priority, clamping to `[1, 5]`.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Returns the raw value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns this priority moved by `delta`, still clamped.
    pub fn nudged(&self, delta: i64) -> Self {
        Self::new(self.0 as i64 + delta)
    }
}

impl From<i64> for FocusPriority {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<FocusPriority> for u8 {
    fn from(priority: FocusPriority) -> Self {
        priority.0
    }
}

/// A named life domain with a priority weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusArea {
    /// Area name, e.g. "Physical Health".
    pub name: String,
    /// Short description.
    pub description: String,
    /// Weight from 1 to 5.
    pub priority: FocusPriority,
}

impl FocusArea {
    /// Creates a focus area.
    pub fn new(name: impl Into<String>, description: impl Into<String>, priority: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            priority: FocusPriority::new(priority),
        }
    }
}

/// A user's identity goal, current-state narrative and ranked focus areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Who the user wants to become.
    pub identity_goal: String,
    /// Where the user is today.
    pub current_state: String,
    /// Ordered focus areas.
    pub focus_areas: Vec<FocusArea>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Blueprint {
    /// Creates a new blueprint.
    pub fn new(
        user_id: Uuid,
        identity_goal: impl Into<String>,
        current_state: impl Into<String>,
        focus_areas: Vec<FocusArea>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            identity_goal: identity_goal.into(),
            current_state: current_state.into(),
            focus_areas,
            created_at: now,
            updated_at: now,
        }
    }
}
