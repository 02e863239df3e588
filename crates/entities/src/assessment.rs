//! Self-assessment and progress assessment entity definitions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::DimensionScores;

/// A weekly self-assessment. At most one per user per `week_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressAssessment {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Blueprint the assessment was made against.
    pub blueprint_id: Option<Uuid>,
    /// Start of the assessed week.
    pub week_of: NaiveDate,
    /// Per-category scores.
    pub dimensions: DimensionScores,
    /// Overall rating from 1 to 10.
    pub overall_rating: u8,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl ProgressAssessment {
    /// Creates a new assessment.
    pub fn new(
        user_id: Uuid,
        week_of: NaiveDate,
        dimensions: DimensionScores,
        overall_rating: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            blueprint_id: None,
            week_of,
            dimensions,
            overall_rating,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Links the assessment to a blueprint.
    pub fn with_blueprint(mut self, blueprint_id: Uuid) -> Self {
        self.blueprint_id = Some(blueprint_id);
        self
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Which onboarding questionnaire a self-assessment answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    /// Free-text description of the ideal self.
    IdealSelf,
    /// 1-100 rating of the current self.
    CurrentSelf,
}

impl AssessmentType {
    /// Storage and wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdealSelf => "ideal_self",
            Self::CurrentSelf => "current_self",
        }
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown assessment type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAssessmentType(pub String);

impl fmt::Display for UnknownAssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown assessment type: {}", self.0)
    }
}

impl std::error::Error for UnknownAssessmentType {}

impl FromStr for AssessmentType {
    type Err = UnknownAssessmentType;

    /// Accepts `ideal_self` and `current_self`, ignoring case and allowing
    /// hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ideal_self" => Ok(Self::IdealSelf),
            "current_self" => Ok(Self::CurrentSelf),
            _ => Err(UnknownAssessmentType(s.to_string())),
        }
    }
}

/// Answers to an onboarding questionnaire.
///
/// `current_self` records carry the dimension scores that drive
/// recommendations; `responses` keeps the raw answers keyed by question id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfAssessment {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Questionnaire answered.
    #[serde(rename = "type")]
    pub assessment_type: AssessmentType,
    /// Per-category scores.
    pub dimensions: DimensionScores,
    /// Raw answers keyed by question id.
    pub responses: Map<String, Value>,
    /// When the questionnaire was submitted.
    pub completed_at: DateTime<Utc>,
}

impl SelfAssessment {
    /// Creates a new self-assessment with no raw answers.
    pub fn new(user_id: Uuid, assessment_type: AssessmentType, dimensions: DimensionScores) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            assessment_type,
            dimensions,
            responses: Map::new(),
            completed_at: Utc::now(),
        }
    }

    /// Sets the raw answers.
    pub fn with_responses(mut self, responses: Map<String, Value>) -> Self {
        self.responses = responses;
        self
    }
}
