//! Life categories, dimension scores and score tiers.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A life domain used to bucket dimension scores and recommendations.
///
/// The declaration order is the canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fitness,
    Career,
    Relationships,
    Learning,
    Wellness,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 5] = [
        Category::Fitness,
        Category::Career,
        Category::Relationships,
        Category::Learning,
        Category::Wellness,
    ];

    /// Returns the lowercase name used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fitness => "fitness",
            Self::Career => "career",
            Self::Relationships => "relationships",
            Self::Learning => "learning",
            Self::Wellness => "wellness",
        }
    }

    /// Returns true if a free-text habit category names this category.
    pub fn matches(&self, text: &str) -> bool {
        text.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.matches(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A 0-100 rating for one category. Out-of-range input is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct DimensionScore(u8);

impl DimensionScore {
    /// Highest possible score.
    pub const MAX: u8 = 100;

    /// Creates a score, clamping to `[0, 100]`.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX as i64) as u8)
    }

    /// Returns the raw value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<i64> for DimensionScore {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<DimensionScore> for u8 {
    fn from(score: DimensionScore) -> Self {
        score.0
    }
}

/// Dimension scores keyed by category, iterated in canonical order.
pub type DimensionScores = BTreeMap<Category, DimensionScore>;

/// Recommendation tier selected by a dimension score bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    /// Score below 40.
    Foundation,
    /// Score in `40..70`.
    Optimization,
    /// Score of 70 or more.
    Advanced,
}

impl ScoreTier {
    /// Buckets a score into its tier.
    pub fn from_score(score: DimensionScore) -> Self {
        match score.value() {
            0..=39 => Self::Foundation,
            40..=69 => Self::Optimization,
            _ => Self::Advanced,
        }
    }

    /// Priority assigned to recommendations of this tier (lower is more urgent).
    pub fn priority(&self) -> i32 {
        match self {
            Self::Foundation => 1,
            Self::Optimization => 2,
            Self::Advanced => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(DimensionScore::new(-5).value(), 0);
        assert_eq!(DimensionScore::new(250).value(), 100);
        assert_eq!(DimensionScore::new(42).value(), 42);

        let parsed: DimensionScore = serde_json::from_str("140").unwrap();
        assert_eq!(parsed.value(), 100);
    }

    #[test]
    fn test_tier_boundaries() {
        let tier = |v| ScoreTier::from_score(DimensionScore::new(v));
        assert_eq!(tier(39), ScoreTier::Foundation);
        assert_eq!(tier(40), ScoreTier::Optimization);
        assert_eq!(tier(69), ScoreTier::Optimization);
        assert_eq!(tier(70), ScoreTier::Advanced);
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Fitness".parse::<Category>().unwrap(), Category::Fitness);
        assert_eq!(" wellness ".parse::<Category>().unwrap(), Category::Wellness);
        assert!("Morning Routine".parse::<Category>().is_err());
    }

    #[test]
    fn test_dimension_map_roundtrips_in_canonical_order() {
        let scores: DimensionScores =
            serde_json::from_str(r#"{"wellness": 80, "fitness": 30}"#).unwrap();
        let keys: Vec<_> = scores.keys().copied().collect();
        assert_eq!(keys, vec![Category::Fitness, Category::Wellness]);

        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"fitness":30,"wellness":80}"#);
    }
}
