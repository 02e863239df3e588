//! API response types.

use entities::{Blueprint, Habit, ProgressAssessment, TrackedHabit, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: User,
    /// True when the server runs without authentication.
    pub single_user_mode: bool,
}

/// A blueprint together with the habits generated for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintWithHabitsResponse {
    pub blueprint: Blueprint,
    pub habits: Vec<Habit>,
}

/// Dashboard summary for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummaryResponse {
    pub habits: Vec<TrackedHabit>,
    /// Habits completed today.
    pub completed_today: usize,
    /// Longest current streak across active habits.
    pub best_current_streak: u32,
    pub latest_assessment: Option<ProgressAssessment>,
}

/// Body of delete and toggle endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
