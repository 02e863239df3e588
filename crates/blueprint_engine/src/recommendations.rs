//! Rule-based recommendation generation.

use chrono::NaiveDate;
use entities::{
    Category, DailyCheckin, DimensionScores, Recommendation, RecommendationKind, ScoreTier,
    TrackedHabit,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, EngineResult, templates::recommendations_for};

/// Default number of recommendations kept after ranking.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 8;
/// A weakest habit with a shorter current streak gets a recommendation.
pub const STREAK_ATTENTION_THRESHOLD: u32 = 7;
/// Number of most recent check-ins averaged for energy.
pub const RECENT_CHECKIN_WINDOW: usize = 7;
/// Average energy below this is considered low.
pub const LOW_ENERGY_THRESHOLD: f64 = 5.0;
/// Check-ins older than this many days are stale.
pub const STALE_CHECKIN_DAYS: i64 = 2;

/// A generated recommendation that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub impact: String,
    pub priority: i32,
    pub kind: RecommendationKind,
}

impl RecommendationDraft {
    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        impact: impl Into<String>,
        priority: i32,
        kind: RecommendationKind,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            impact: impact.into(),
            priority,
            kind,
        }
    }

    /// Turns the draft into an active recommendation for `user_id`.
    pub fn into_recommendation(self, user_id: Uuid) -> Recommendation {
        Recommendation::new(
            user_id,
            self.title,
            self.description,
            self.category,
            self.impact,
            self.priority,
            self.kind,
        )
    }
}

/// Knobs for [`generate_recommendations`].
#[derive(Debug, Clone, Copy)]
pub struct RecommendationOptions {
    /// Maximum number of drafts returned.
    pub limit: usize,
    /// Reference date for check-in staleness.
    pub today: NaiveDate,
}

impl RecommendationOptions {
    /// Options with the default limit.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            limit: DEFAULT_RECOMMENDATION_LIMIT,
            today,
        }
    }

    /// Sets the limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Ranks recommendations for a user's scores, habits and check-ins.
///
/// Drafts are generated dimension-based first (in category order), then
/// habit-based, then check-in-based. They are then stably sorted by priority,
/// so equal priorities keep generation order, and truncated to
/// `options.limit`.
pub fn generate_recommendations(
    scores: &DimensionScores,
    habits: &[TrackedHabit],
    checkins: &[DailyCheckin],
    options: RecommendationOptions,
) -> EngineResult<Vec<RecommendationDraft>> {
    if scores.is_empty() {
        return Err(EngineError::validation("dimension scores must not be empty"));
    }

    let mut drafts = dimension_recommendations(scores);
    drafts.extend(habit_recommendations(habits));
    drafts.extend(checkin_recommendations(checkins, options.today));

    drafts.sort_by_key(|d| d.priority);
    drafts.truncate(options.limit);

    tracing::debug!(
        count = drafts.len(),
        limit = options.limit,
        "Generated recommendations"
    );
    Ok(drafts)
}

/// The recommendation offered before any self-assessment exists.
pub fn onboarding_recommendations() -> Vec<RecommendationDraft> {
    vec![RecommendationDraft::new(
        "Complete your self-assessment",
        "Take the ideal self and current self assessments to get personalized recommendations.",
        "general",
        "+50% recommendation accuracy",
        1,
        RecommendationKind::CompleteAssessment,
    )]
}

fn dimension_recommendations(scores: &DimensionScores) -> Vec<RecommendationDraft> {
    scores
        .iter()
        .flat_map(|(&category, &score)| {
            let tier = ScoreTier::from_score(score);
            recommendations_for(category, tier).iter().map(move |t| {
                RecommendationDraft::new(
                    t.title,
                    t.description,
                    category.as_str(),
                    t.impact,
                    tier.priority(),
                    RecommendationKind::for_tier(tier),
                )
            })
        })
        .collect()
}

fn habit_recommendations(habits: &[TrackedHabit]) -> Vec<RecommendationDraft> {
    let mut drafts = Vec::new();

    // min_by_key keeps the first of equal minimums.
    if let Some(weakest) = habits.iter().min_by_key(|h| h.current_streak) {
        if weakest.current_streak < STREAK_ATTENTION_THRESHOLD {
            let title = &weakest.habit.title;
            drafts.push(RecommendationDraft::new(
                format!("Strengthen your {title} habit"),
                format!(
                    "Your {title} habit needs attention. Try habit stacking by linking it to an existing strong routine."
                ),
                weakest.habit.category.clone(),
                "+40% habit consistency",
                1,
                RecommendationKind::StrengthenHabit,
            ));
        }
    }

    let missing = Category::ALL
        .into_iter()
        .find(|c| !habits.iter().any(|h| c.matches(&h.habit.category)));
    if let Some(category) = missing {
        drafts.push(RecommendationDraft::new(
            format!("Add a {category} habit"),
            format!(
                "You don't have any {category} habits yet. Consider adding one to create a more balanced routine."
            ),
            category.as_str(),
            "+30% life balance",
            2,
            RecommendationKind::BalanceHabits,
        ));
    }

    drafts
}

fn checkin_recommendations(checkins: &[DailyCheckin], today: NaiveDate) -> Vec<RecommendationDraft> {
    if checkins.is_empty() {
        return vec![RecommendationDraft::new(
            "Start daily check-ins",
            "Regular self-reflection through daily check-ins will help track your emotional patterns and progress.",
            Category::Wellness.as_str(),
            "+50% self-awareness",
            1,
            RecommendationKind::StartCheckins,
        )];
    }

    let mut recent: Vec<&DailyCheckin> = checkins.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_CHECKIN_WINDOW);

    let mut drafts = Vec::new();

    let total: u32 = recent.iter().map(|c| u32::from(c.energy_level)).sum();
    let average = f64::from(total) / recent.len() as f64;
    if average < LOW_ENERGY_THRESHOLD {
        drafts.push(RecommendationDraft::new(
            "Improve your energy management",
            "Your recent energy levels are below average. Focus on sleep, nutrition, and stress management.",
            Category::Wellness.as_str(),
            "+30% daily energy",
            1,
            RecommendationKind::EnergyManagement,
        ));
    }

    let latest = recent[0].date;
    if (today - latest).num_days() > STALE_CHECKIN_DAYS {
        drafts.push(RecommendationDraft::new(
            "Maintain consistent check-ins",
            "Regular check-ins help you stay aware of your patterns and progress. Try setting a daily reminder.",
            Category::Wellness.as_str(),
            "+25% self-awareness",
            2,
            RecommendationKind::CheckinConsistency,
        ));
    }

    drafts
}

#[cfg(test)]
mod tests {
    use entities::{DimensionScore, Habit, Streak};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 30).unwrap()
    }

    fn scores(entries: &[(Category, i64)]) -> DimensionScores {
        entries
            .iter()
            .map(|&(c, s)| (c, DimensionScore::new(s)))
            .collect()
    }

    fn habit(title: &str, category: &str, streak: u32) -> TrackedHabit {
        TrackedHabit::new(
            Habit::new(Uuid::new_v4(), title, category),
            Streak {
                current: streak,
                longest: streak,
            },
        )
    }

    fn checkin(days_ago: u64, energy: u8) -> DailyCheckin {
        let date = today() - chrono::Days::new(days_ago);
        DailyCheckin::new(Uuid::new_v4(), date, "ok", energy)
    }

    fn options() -> RecommendationOptions {
        RecommendationOptions::new(today()).with_limit(usize::MAX)
    }

    #[test]
    fn test_tier_boundaries() {
        for (score, tier, priority) in [
            (39, ScoreTier::Foundation, 1),
            (40, ScoreTier::Optimization, 2),
            (69, ScoreTier::Optimization, 2),
            (70, ScoreTier::Advanced, 3),
        ] {
            let drafts = generate_recommendations(
                &scores(&[(Category::Learning, score)]),
                &[],
                &[],
                options(),
            )
            .unwrap();
            let dimension: Vec<_> = drafts.iter().filter(|d| d.kind.tier().is_some()).collect();
            assert!(!dimension.is_empty());
            for draft in dimension {
                assert_eq!(draft.kind.tier(), Some(tier), "score {score}");
                assert_eq!(draft.priority, priority);
                assert_eq!(draft.category, "learning");
            }
        }
    }

    #[test]
    fn test_sorted_with_generation_order_ties() {
        let drafts = generate_recommendations(
            &scores(&[(Category::Career, 80), (Category::Fitness, 30)]),
            &[habit("Stretch", "fitness", 1)],
            &[],
            options(),
        )
        .unwrap();

        let titles: Vec<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Start with 10-minute daily walks",
                "Track your water intake",
                "Strengthen your Stretch habit",
                "Start daily check-ins",
                "Add a career habit",
                "Mentor someone in your field",
            ]
        );
        assert!(drafts.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn test_weakest_habit_only() {
        let drafts = generate_recommendations(
            &scores(&[(Category::Wellness, 50)]),
            &[habit("A", "fitness", 2), habit("B", "learning", 10)],
            &[],
            options(),
        )
        .unwrap();

        let strengthen_a = drafts
            .iter()
            .find(|d| d.title == "Strengthen your A habit")
            .unwrap();
        assert_eq!(strengthen_a.priority, 1);
        assert_eq!(strengthen_a.category, "fitness");
        assert!(!drafts.iter().any(|d| d.title.contains("Strengthen your B")));
    }

    #[test]
    fn test_strong_habits_need_no_attention() {
        let drafts = generate_recommendations(
            &scores(&[(Category::Wellness, 50)]),
            &[habit("A", "fitness", 7), habit("B", "learning", 12)],
            &[],
            options(),
        )
        .unwrap();
        assert!(!drafts
            .iter()
            .any(|d| d.kind == RecommendationKind::StrengthenHabit));
    }

    #[test]
    fn test_first_missing_category_only() {
        let habits: Vec<_> = ["Fitness", "career", "Relationships"]
            .iter()
            .map(|c| habit("h", c, 10))
            .collect();
        let drafts =
            generate_recommendations(&scores(&[(Category::Career, 50)]), &habits, &[], options())
                .unwrap();
        let balance: Vec<_> = drafts
            .iter()
            .filter(|d| d.kind == RecommendationKind::BalanceHabits)
            .collect();
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[0].title, "Add a learning habit");
        assert_eq!(balance[0].priority, 2);
    }

    #[test]
    fn test_low_energy_uses_recent_window() {
        // Seven recent low days outweigh older high-energy days.
        let mut checkins: Vec<_> = (0..7).map(|d| checkin(d, 3)).collect();
        checkins.extend((7..20).map(|d| checkin(d, 10)));

        let drafts =
            generate_recommendations(&scores(&[(Category::Fitness, 50)]), &[], &checkins, options())
                .unwrap();
        let energy = drafts
            .iter()
            .find(|d| d.kind == RecommendationKind::EnergyManagement)
            .unwrap();
        assert_eq!(energy.priority, 1);
        assert!(!drafts
            .iter()
            .any(|d| d.kind == RecommendationKind::CheckinConsistency));
        assert!(!drafts.iter().any(|d| d.kind == RecommendationKind::StartCheckins));
    }

    #[test]
    fn test_average_of_five_is_not_low() {
        let checkins = vec![checkin(0, 4), checkin(1, 6)];
        let drafts =
            generate_recommendations(&scores(&[(Category::Fitness, 50)]), &[], &checkins, options())
                .unwrap();
        assert!(!drafts
            .iter()
            .any(|d| d.kind == RecommendationKind::EnergyManagement));
    }

    #[test]
    fn test_staleness_uses_most_recent_checkin() {
        let fresh = vec![checkin(10, 8), checkin(2, 8)];
        let drafts =
            generate_recommendations(&scores(&[(Category::Fitness, 50)]), &[], &fresh, options())
                .unwrap();
        assert!(!drafts
            .iter()
            .any(|d| d.kind == RecommendationKind::CheckinConsistency));

        let stale = vec![checkin(3, 8)];
        let drafts =
            generate_recommendations(&scores(&[(Category::Fitness, 50)]), &[], &stale, options())
                .unwrap();
        let reminder = drafts
            .iter()
            .find(|d| d.kind == RecommendationKind::CheckinConsistency)
            .unwrap();
        assert_eq!(reminder.priority, 2);
    }

    #[test]
    fn test_truncates_to_limit() {
        let all: Vec<_> = Category::ALL.iter().map(|&c| (c, 10)).collect();
        let drafts = generate_recommendations(
            &scores(&all),
            &[],
            &[],
            RecommendationOptions::new(today()),
        )
        .unwrap();
        assert_eq!(drafts.len(), DEFAULT_RECOMMENDATION_LIMIT);
        assert!(drafts.iter().all(|d| d.priority == 1));

        let drafts = generate_recommendations(
            &scores(&all),
            &[],
            &[],
            RecommendationOptions::new(today()).with_limit(4),
        )
        .unwrap();
        assert_eq!(drafts.len(), 4);
    }

    #[test]
    fn test_empty_scores_rejected() {
        let result =
            generate_recommendations(&DimensionScores::new(), &[], &[], options());
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_onboarding() {
        let drafts = onboarding_recommendations();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].kind, RecommendationKind::CompleteAssessment);

        let user_id = Uuid::new_v4();
        let stored = drafts[0].clone().into_recommendation(user_id);
        assert_eq!(stored.user_id, user_id);
        assert!(stored.is_active);
        assert_eq!(stored.priority, 1);
    }
}
