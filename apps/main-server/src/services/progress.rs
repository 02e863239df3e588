//! Habit progress derived from completion history.

use std::collections::HashMap;

use align_store::{AlignStore, CompletionFilter, HabitFilter, StoreResult};
use chrono::NaiveDate;
use entities::{Habit, HabitCompletion, Streak, TrackedHabit};
use uuid::Uuid;

/// Attaches streaks to `habits` from `completions` as seen on `today`.
///
/// Completions of habits not in `habits` are ignored.
pub fn track_habits(
    habits: Vec<Habit>,
    completions: &[HabitCompletion],
    today: NaiveDate,
) -> Vec<TrackedHabit> {
    let mut dates: HashMap<Uuid, Vec<NaiveDate>> = HashMap::new();
    for completion in completions {
        dates.entry(completion.habit_id).or_default().push(completion.date);
    }

    habits
        .into_iter()
        .map(|habit| {
            let streak = dates
                .remove(&habit.id)
                .map(|days| Streak::from_dates(days, today))
                .unwrap_or_default();
            TrackedHabit::new(habit, streak)
        })
        .collect()
}

/// Loads a user's active habits with their streaks.
pub async fn tracked_habits<S: AlignStore + ?Sized>(
    store: &S,
    user_id: Uuid,
    today: NaiveDate,
) -> StoreResult<Vec<TrackedHabit>> {
    let habits = store.list_habits(HabitFilter::active_for_user(user_id)).await?;
    let completions = store
        .list_habit_completions(CompletionFilter::for_user(user_id))
        .await?;
    Ok(track_habits(habits, &completions, today))
}
