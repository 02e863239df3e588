//! Community update entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of a community update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// A completed goal.
    Achievement,
    /// A streak or progress milestone.
    Milestone,
    /// Anything else.
    #[default]
    General,
}

impl UpdateType {
    /// Storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Achievement => "achievement",
            Self::Milestone => "milestone",
            Self::General => "general",
        }
    }

    /// Parses a storage name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "achievement" => Some(Self::Achievement),
            "milestone" => Some(Self::Milestone),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

/// A post shared with the community feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityUpdate {
    /// Unique identifier.
    pub id: Uuid,
    /// Author.
    pub user_id: Uuid,
    /// Post text.
    pub content: String,
    /// Post type.
    #[serde(rename = "type")]
    pub update_type: UpdateType,
    /// Like counter.
    pub likes: u32,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl CommunityUpdate {
    /// Creates a new update with zero likes.
    pub fn new(user_id: Uuid, content: impl Into<String>, update_type: UpdateType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content: content.into(),
            update_type,
            likes: 0,
            created_at: Utc::now(),
        }
    }
}
