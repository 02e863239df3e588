//! API request types.

use chrono::NaiveDate;
use entities::{
    AssessmentType, BuddyStatus, DimensionScores, UpdateType, MAX_ENERGY_LEVEL, MIN_ENERGY_LEVEL,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::validation::*;

/// Longest habit duration accepted, one day.
pub const MAX_HABIT_DURATION_MINUTES: u32 = 24 * 60;
/// Longest community post accepted.
pub const MAX_COMMUNITY_CONTENT_CHARS: usize = 1000;
/// Community feed size when no limit is given.
pub const DEFAULT_COMMUNITY_LIMIT: u32 = 10;
/// Largest community feed page.
pub const MAX_COMMUNITY_LIMIT: u32 = 100;

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("displayName", self.display_name.as_deref())?;
        optional_text("firstName", self.first_name.as_deref())?;
        optional_text("lastName", self.last_name.as_deref())?;
        optional_text("profileImageUrl", self.profile_image_url.as_deref())
    }
}

// ============================================================================
// Blueprint Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBlueprintRequest {
    pub responses: Vec<String>,
}

impl Validate for GenerateBlueprintRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.responses.is_empty() {
            return Err(ValidationError::new("responses", "must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineBlueprintRequest {
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub new_goals: Option<String>,
    /// Replace the blueprint's habits with freshly generated ones.
    #[serde(default)]
    pub regenerate_habits: bool,
}

impl Validate for RefineBlueprintRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

// ============================================================================
// Habit Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub focus_area: Option<String>,
    pub duration_minutes: Option<u32>,
}

impl Validate for CreateHabitRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("category", &self.category)?;
        optional_text("focusArea", self.focus_area.as_deref())?;
        if let Some(minutes) = self.duration_minutes {
            require_range("durationMinutes", minutes, 1, MAX_HABIT_DURATION_MINUTES)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub focus_area: Option<String>,
    pub duration_minutes: Option<u32>,
}

impl Validate for UpdateHabitRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("title", self.title.as_deref())?;
        optional_text("category", self.category.as_deref())?;
        if let Some(minutes) = self.duration_minutes {
            require_range("durationMinutes", minutes, 1, MAX_HABIT_DURATION_MINUTES)?;
        }
        Ok(())
    }
}

// ============================================================================
// Habit Completion Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteHabitRequest {
    pub habit_id: Uuid,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

impl Validate for CompleteHabitRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// `?date=` or `?startDate=&endDate=`; neither means today.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Resolved form of a [`CompletionQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionWindow {
    Day(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl CompletionQuery {
    /// Resolves the query, using `today` when no date is given.
    pub fn window(&self, today: NaiveDate) -> CompletionWindow {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => CompletionWindow::Range(start, end),
            _ => CompletionWindow::Day(self.date.unwrap_or(today)),
        }
    }
}

impl Validate for CompletionQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(ValidationError::new(
                "startDate",
                "must not be after endDate",
            )),
            (Some(_), None) => Err(ValidationError::new("endDate", "required with startDate")),
            (None, Some(_)) => Err(ValidationError::new("startDate", "required with endDate")),
            (Some(_), Some(_)) if self.date.is_some() => Err(ValidationError::new(
                "date",
                "cannot be combined with a date range",
            )),
            _ => Ok(()),
        }
    }
}

/// `?date=`; absent means today.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

impl Validate for DateQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

// ============================================================================
// Check-in and Assessment Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckinRequest {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub mood: String,
    pub energy_level: u8,
    pub notes: Option<String>,
}

impl Validate for CreateCheckinRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("mood", &self.mood)?;
        require_range(
            "energyLevel",
            self.energy_level,
            MIN_ENERGY_LEVEL,
            MAX_ENERGY_LEVEL,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressAssessmentRequest {
    pub week_of: NaiveDate,
    /// Scores are clamped to `[0, 100]` on decode.
    pub dimensions: DimensionScores,
    pub overall_rating: u8,
    pub notes: Option<String>,
}

impl Validate for CreateProgressAssessmentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.dimensions.is_empty() {
            return Err(ValidationError::new("dimensions", "must not be empty"));
        }
        require_range("overallRating", self.overall_rating, 1, 10)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSelfAssessmentRequest {
    #[serde(rename = "type")]
    pub assessment_type: AssessmentType,
    /// Scores are clamped to `[0, 100]` on decode.
    #[serde(default)]
    pub dimensions: DimensionScores,
    /// Raw answers keyed by question id.
    #[serde(default)]
    pub responses: Map<String, Value>,
}

impl Validate for CreateSelfAssessmentRequest {
    /// A `current_self` assessment must carry scores; an `ideal_self` one
    /// must carry answers.
    fn validate(&self) -> Result<(), ValidationError> {
        match self.assessment_type {
            AssessmentType::CurrentSelf if self.dimensions.is_empty() => {
                Err(ValidationError::new("dimensions", "must not be empty"))
            }
            AssessmentType::IdealSelf if self.responses.is_empty() => {
                Err(ValidationError::new("responses", "must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Recommendation Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecommendationRequest {
    pub is_active: bool,
}

impl Validate for UpdateRecommendationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

// ============================================================================
// Accountability Buddy Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuddyRequest {
    pub buddy_id: Uuid,
    #[serde(default)]
    pub status: BuddyStatus,
}

impl Validate for CreateBuddyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

// ============================================================================
// Community Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityUpdateRequest {
    pub content: String,
    #[serde(rename = "type", default)]
    pub update_type: UpdateType,
}

impl Validate for CreateCommunityUpdateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content)?;
        max_chars("content", &self.content, MAX_COMMUNITY_CONTENT_CHARS)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityQuery {
    pub limit: Option<u32>,
}

impl CommunityQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_COMMUNITY_LIMIT)
    }
}

impl Validate for CommunityQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.limit {
            Some(limit) => require_range("limit", limit, 1, MAX_COMMUNITY_LIMIT),
            None => Ok(()),
        }
    }
}
