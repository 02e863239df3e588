//! Habit and habit completion entity definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Streak;

/// A recurring action tied to a category and optionally a focus area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Blueprint this habit was created for.
    pub blueprint_id: Option<Uuid>,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Free-text category, e.g. "fitness" or "Morning Routine".
    pub category: String,
    /// Focus area tag.
    pub focus_area: Option<String>,
    /// Expected duration in minutes.
    pub duration_minutes: Option<u32>,
    /// False once the habit has been deleted.
    pub is_active: bool,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Creates a new active habit.
    pub fn new(user_id: Uuid, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            blueprint_id: None,
            title: title.into(),
            description: None,
            category: category.into(),
            focus_area: None,
            duration_minutes: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Links the habit to a blueprint.
    pub fn with_blueprint(mut self, blueprint_id: Uuid) -> Self {
        self.blueprint_id = Some(blueprint_id);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the focus area tag.
    pub fn with_focus_area(mut self, focus_area: impl Into<String>) -> Self {
        self.focus_area = Some(focus_area.into());
        self
    }

    /// Sets the duration in minutes.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

/// A habit together with its derived streak counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedHabit {
    #[serde(flatten)]
    pub habit: Habit,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl TrackedHabit {
    /// Attaches a streak to a habit.
    pub fn new(habit: Habit, streak: Streak) -> Self {
        Self {
            habit,
            current_streak: streak.current,
            longest_streak: streak.longest,
        }
    }
}

/// A habit marked done on a calendar date. Unique per `(habit_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCompletion {
    /// Unique identifier.
    pub id: Uuid,
    /// Completed habit.
    pub habit_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Calendar date of the completion.
    pub date: NaiveDate,
    /// When the completion was recorded.
    pub completed_at: DateTime<Utc>,
}

impl HabitCompletion {
    /// Creates a new completion.
    pub fn new(habit_id: Uuid, user_id: Uuid, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            user_id,
            date,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habit_builder() {
        let user_id = Uuid::new_v4();
        let blueprint_id = Uuid::new_v4();
        let habit = Habit::new(user_id, "Morning Meditation", "Morning Routine")
            .with_blueprint(blueprint_id)
            .with_focus_area("Mindfulness")
            .with_duration(10);

        assert!(habit.is_active);
        assert_eq!(habit.blueprint_id, Some(blueprint_id));
        assert_eq!(habit.duration_minutes, Some(10));
    }

    #[test]
    fn test_tracked_habit_flattens() {
        let habit = Habit::new(Uuid::new_v4(), "Workout", "fitness");
        let tracked = TrackedHabit::new(
            habit,
            Streak {
                current: 3,
                longest: 8,
            },
        );
        let json = serde_json::to_value(&tracked).unwrap();

        assert_eq!(json["title"], "Workout");
        assert_eq!(json["currentStreak"], 3);
        assert_eq!(json["longestStreak"], 8);
    }

    #[test]
    fn test_completion_date_format() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        let completion = HabitCompletion::new(Uuid::new_v4(), Uuid::new_v4(), date);
        let json = serde_json::to_value(&completion).unwrap();

        assert_eq!(json["date"], "2025-01-30");
    }
}
