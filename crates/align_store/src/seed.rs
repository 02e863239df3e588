//! Demo fixtures for local development.

use chrono::{Days, NaiveDate};
use entities::{
    AssessmentType, Blueprint, Category, DailyCheckin, DimensionScore, DimensionScores,
    FocusArea, Habit, HabitCompletion, ProgressAssessment, Recommendation, RecommendationKind,
    SelfAssessment, User,
};

use crate::{AlignStore, StoreResult};

/// Email of the demo account created by [`seed_demo_data`].
pub const DEMO_USER_EMAIL: &str = "alex@example.com";

/// (title, description, category, minutes, current streak, longest streak)
const DEMO_HABITS: [(&str, &str, &str, u32, u64, u64); 3] = [
    ("Morning Meditation", "10 minutes of mindfulness", "wellness", 10, 23, 45),
    ("Read 30 minutes", "Non-fiction or personal development", "learning", 30, 12, 28),
    ("Workout", "45 minutes strength training", "fitness", 45, 8, 15),
];

/// Populates the store with a demo account and some history ending the day
/// before `today`.
///
/// Returns the existing account untouched if it was already seeded.
pub async fn seed_demo_data<S: AlignStore + ?Sized>(store: &S, today: NaiveDate) -> StoreResult<User> {
    if let Some(existing) = store.get_user_by_email(DEMO_USER_EMAIL).await? {
        tracing::debug!(user_id = %existing.id, "Demo data already present");
        return Ok(existing);
    }

    let user = store
        .create_user(
            User::new(DEMO_USER_EMAIL)
                .with_display_name("Alex Johnson")
                .with_names("Alex", "Johnson"),
        )
        .await?;

    let blueprint = store
        .create_blueprint(Blueprint::new(
            user.id,
            "A focused, healthy professional who leads by example",
            "Inconsistent routines and low energy in the afternoons",
            vec![
                FocusArea::new("fitness", "Build strength and endurance", 4),
                FocusArea::new("wellness", "Protect sleep and stress levels", 5),
                FocusArea::new("learning", "Read every day", 3),
            ],
        ))
        .await?;

    for (title, description, category, minutes, current, longest) in DEMO_HABITS {
        let habit = store
            .create_habit(
                Habit::new(user.id, title, category)
                    .with_blueprint(blueprint.id)
                    .with_description(description)
                    .with_focus_area(category)
                    .with_duration(minutes),
            )
            .await?;

        // Current run ends yesterday; the longest run sits behind a one-day gap.
        let current_days = (1..=current).filter_map(|n| today.checked_sub_days(Days::new(n)));
        let longest_days = (current + 2..current + 2 + longest)
            .filter_map(|n| today.checked_sub_days(Days::new(n)));
        for date in current_days.chain(longest_days) {
            store
                .create_habit_completion(HabitCompletion::new(habit.id, user.id, date))
                .await?;
        }
    }

    let moods = [("good", 7), ("great", 8), ("okay", 6)];
    for (offset, (mood, energy)) in (1u64..).zip(moods) {
        if let Some(date) = today.checked_sub_days(Days::new(offset)) {
            store
                .create_daily_checkin(DailyCheckin::new(user.id, date, mood, energy))
                .await?;
        }
    }

    let dimensions: DimensionScores = [
        (Category::Fitness, 45),
        (Category::Career, 78),
        (Category::Relationships, 62),
        (Category::Learning, 34),
    ]
    .into_iter()
    .map(|(category, score)| (category, DimensionScore::new(score)))
    .collect();
    store
        .create_self_assessment(SelfAssessment::new(
            user.id,
            AssessmentType::CurrentSelf,
            dimensions.clone(),
        ))
        .await?;
    let week_of = today
        .checked_sub_days(Days::new(7))
        .unwrap_or(today);
    store
        .create_progress_assessment(
            ProgressAssessment::new(user.id, week_of, dimensions, 7).with_blueprint(blueprint.id),
        )
        .await?;

    store
        .create_recommendation(Recommendation::new(
            user.id,
            "Set bedtime alarm for 10:30 PM",
            "Based on your progress, focus on a consistent sleep schedule",
            "wellness",
            "+15% sleep quality improvement",
            1,
            RecommendationKind::Custom,
        ))
        .await?;
    store
        .create_recommendation(Recommendation::new(
            user.id,
            "Add protein shake post-workout",
            "Increase protein intake for better recovery",
            "fitness",
            "+22% muscle recovery",
            2,
            RecommendationKind::Custom,
        ))
        .await?;

    tracing::info!(user_id = %user.id, email = DEMO_USER_EMAIL, "Seeded demo data");
    Ok(user)
}
