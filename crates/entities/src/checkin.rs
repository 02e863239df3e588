//! Daily check-in entity definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest accepted energy level.
pub const MIN_ENERGY_LEVEL: u8 = 1;
/// Highest accepted energy level.
pub const MAX_ENERGY_LEVEL: u8 = 10;

/// A mood/energy log entry. At most one per user per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCheckin {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Calendar date.
    pub date: NaiveDate,
    /// Mood marker, usually an emoji.
    pub mood: String,
    /// Energy from 1 to 10.
    pub energy_level: u8,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the check-in was recorded.
    pub completed_at: DateTime<Utc>,
}

impl DailyCheckin {
    /// Creates a new check-in.
    pub fn new(user_id: Uuid, date: NaiveDate, mood: impl Into<String>, energy_level: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            mood: mood.into(),
            energy_level,
            notes: None,
            completed_at: Utc::now(),
        }
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
