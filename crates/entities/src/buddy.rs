//! Accountability buddy entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a buddy link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuddyStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

impl BuddyStatus {
    /// Storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a storage name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A one-way link from a user to another user who keeps them accountable.
/// At most one link per `(user_id, buddy_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountabilityBuddy {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// The linked user.
    pub buddy_id: Uuid,
    /// Link state.
    pub status: BuddyStatus,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl AccountabilityBuddy {
    /// Creates an active link.
    pub fn new(user_id: Uuid, buddy_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            buddy_id,
            status: BuddyStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: BuddyStatus) -> Self {
        self.status = status;
        self
    }
}
