//! Behavior shared by every [`AlignStore`] implementation.
//!
//! Each function runs against a fresh store and panics on the first
//! mismatch.

use std::sync::Arc;

use chrono::NaiveDate;
use entities::{
    AccountabilityBuddy, AssessmentType, Blueprint, BuddyStatus, Category, CommunityUpdate,
    DailyCheckin, DimensionScore, DimensionScores, FocusArea, Habit, HabitCompletion,
    ProgressAssessment, Recommendation, RecommendationKind, SelfAssessment, UpdateType, User,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{AlignStore, CompletionFilter, HabitFilter, StoreError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

async fn user<S: AlignStore>(store: &S, email: &str) -> User {
    store.create_user(User::new(email)).await.unwrap()
}

pub async fn user_lifecycle<S: AlignStore>(store: &S) {
    let created = store
        .create_user(User::new("alex@example.com").with_names("Alex", "Johnson"))
        .await
        .unwrap();

    let fetched = store.get_user(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, "alex@example.com");
    assert_eq!(fetched.first_name.as_deref(), Some("Alex"));

    let by_email = store
        .get_user_by_email("alex@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, created.id);
    assert!(store.get_user_by_email("nobody@example.com").await.unwrap().is_none());

    let duplicate = store.create_user(User::new("alex@example.com")).await;
    assert!(matches!(duplicate, Err(StoreError::AlreadyExists { .. })));

    let updated = store
        .update_user(User {
            display_name: Some("AJ".to_string()),
            ..fetched
        })
        .await
        .unwrap();
    assert_eq!(updated.display_name.as_deref(), Some("AJ"));

    // Emails stay unique across updates.
    let other = user(store, "sam@example.com").await;
    let stolen = store
        .update_user(User {
            email: "alex@example.com".to_string(),
            ..other.clone()
        })
        .await;
    assert!(matches!(stolen, Err(StoreError::AlreadyExists { .. })));
    let owner = store
        .get_user_by_email("alex@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner.id, created.id);
    assert_eq!(
        store.get_user(other.id).await.unwrap().unwrap().email,
        "sam@example.com"
    );

    let missing = store.update_user(User::new("ghost@example.com")).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));

    store.delete_user(created.id).await.unwrap();
    assert!(store.get_user(created.id).await.unwrap().is_none());
    assert!(matches!(
        store.delete_user(created.id).await,
        Err(StoreError::NotFound { .. })
    ));
}

pub async fn blueprints_and_habits<S: AlignStore>(store: &S) {
    let owner = user(store, "habits@example.com").await;

    let first = store
        .create_blueprint(Blueprint::new(
            owner.id,
            "Become a calm leader",
            "Busy",
            vec![FocusArea::new("career", "Lead with clarity", 5)],
        ))
        .await
        .unwrap();
    let second = store
        .create_blueprint(Blueprint::new(owner.id, "Run a marathon", "Sedentary", vec![]))
        .await
        .unwrap();

    let latest = store.get_latest_blueprint(owner.id).await.unwrap().unwrap();
    assert_eq!(latest.id, second.id);
    let all = store.list_blueprints(owner.id).await.unwrap();
    assert_eq!(
        all.iter().map(|b| b.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );

    let refined = store
        .update_blueprint(Blueprint {
            identity_goal: "Become a patient leader".to_string(),
            ..first.clone()
        })
        .await
        .unwrap();
    assert_eq!(refined.identity_goal, "Become a patient leader");
    assert_eq!(refined.focus_areas, first.focus_areas);
    assert_eq!(refined.created_at, first.created_at);

    let orphan = store
        .create_blueprint(Blueprint::new(Uuid::new_v4(), "x", "y", vec![]))
        .await;
    assert!(matches!(orphan, Err(StoreError::ForeignKeyViolation(_))));

    let run = store
        .create_habit(Habit::new(owner.id, "Run", "fitness").with_blueprint(second.id))
        .await
        .unwrap();
    let read = store
        .create_habit(Habit::new(owner.id, "Read", "learning").with_duration(20))
        .await
        .unwrap();
    let journal = store
        .create_habit(Habit::new(owner.id, "Journal", "fitness"))
        .await
        .unwrap();

    let listed = store
        .list_habits(HabitFilter::active_for_user(owner.id))
        .await
        .unwrap();
    let titles: Vec<&str> = listed.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Journal", "Run", "Read"]);

    let for_blueprint = store
        .list_habits(HabitFilter::active_for_blueprint(second.id))
        .await
        .unwrap();
    assert_eq!(for_blueprint.len(), 1);
    assert_eq!(for_blueprint[0].id, run.id);

    let edited = store
        .update_habit(Habit {
            title: "Read fiction".to_string(),
            ..read.clone()
        })
        .await
        .unwrap();
    assert_eq!(edited.title, "Read fiction");
    assert_eq!(edited.duration_minutes, Some(20));

    let deactivated = store.deactivate_habit(journal.id).await.unwrap();
    assert!(!deactivated.is_active);
    let active = store
        .list_habits(HabitFilter::active_for_user(owner.id))
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
    let everything = store
        .list_habits(HabitFilter {
            user_id: Some(owner.id),
            include_inactive: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);
    assert!(store.get_habit(journal.id).await.unwrap().is_some());

    assert!(matches!(
        store.deactivate_habit(Uuid::new_v4()).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        store
            .create_habit(Habit::new(Uuid::new_v4(), "Orphan", "fitness"))
            .await,
        Err(StoreError::ForeignKeyViolation(_))
    ));
}

pub async fn completion_uniqueness<S: AlignStore>(store: &S) {
    let owner = user(store, "done@example.com").await;
    let other = user(store, "other@example.com").await;
    let habit = store
        .create_habit(Habit::new(owner.id, "Meditate", "wellness"))
        .await
        .unwrap();

    store
        .create_habit_completion(HabitCompletion::new(habit.id, owner.id, day(10)))
        .await
        .unwrap();
    let duplicate = store
        .create_habit_completion(HabitCompletion::new(habit.id, owner.id, day(10)))
        .await;
    assert!(matches!(duplicate, Err(StoreError::AlreadyExists { .. })));

    let foreign = store
        .create_habit_completion(HabitCompletion::new(habit.id, other.id, day(11)))
        .await;
    assert!(matches!(foreign, Err(StoreError::NotFound { .. })));

    let unknown = store
        .create_habit_completion(HabitCompletion::new(Uuid::new_v4(), owner.id, day(11)))
        .await;
    assert!(matches!(unknown, Err(StoreError::NotFound { .. })));

    store
        .delete_habit_completion(habit.id, owner.id, day(10))
        .await
        .unwrap();
    assert!(matches!(
        store.delete_habit_completion(habit.id, owner.id, day(10)).await,
        Err(StoreError::NotFound { .. })
    ));

    // A removed completion can be recorded again.
    store
        .create_habit_completion(HabitCompletion::new(habit.id, owner.id, day(10)))
        .await
        .unwrap();
}

pub async fn completion_queries<S: AlignStore>(store: &S) {
    let owner = user(store, "range@example.com").await;
    let a = store
        .create_habit(Habit::new(owner.id, "A", "fitness"))
        .await
        .unwrap();
    let b = store
        .create_habit(Habit::new(owner.id, "B", "learning"))
        .await
        .unwrap();

    for (habit, d) in [(a.id, 12), (a.id, 10), (b.id, 10), (b.id, 15)] {
        store
            .create_habit_completion(HabitCompletion::new(habit, owner.id, day(d)))
            .await
            .unwrap();
    }

    let on_tenth = store
        .list_habit_completions(CompletionFilter::on_date(owner.id, day(10)))
        .await
        .unwrap();
    assert_eq!(on_tenth.len(), 2);

    let range = store
        .list_habit_completions(CompletionFilter::between(owner.id, day(10), day(12)))
        .await
        .unwrap();
    let dates: Vec<NaiveDate> = range.iter().map(|c| c.date).collect();
    assert_eq!(dates, vec![day(10), day(10), day(12)]);

    let history_of_b = store
        .list_habit_completions(CompletionFilter {
            habit_id: Some(b.id),
            ..CompletionFilter::for_user(owner.id)
        })
        .await
        .unwrap();
    assert_eq!(
        history_of_b.iter().map(|c| c.date).collect::<Vec<_>>(),
        vec![day(10), day(15)]
    );

    // Deactivating keeps history.
    store.deactivate_habit(a.id).await.unwrap();
    let all = store
        .list_habit_completions(CompletionFilter::for_user(owner.id))
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
}

pub async fn checkins_and_assessments<S: AlignStore>(store: &S) {
    let owner = user(store, "checkin@example.com").await;

    store
        .create_daily_checkin(DailyCheckin::new(owner.id, day(3), "good", 7).with_notes("Slept well"))
        .await
        .unwrap();
    store
        .create_daily_checkin(DailyCheckin::new(owner.id, day(1), "tired", 3))
        .await
        .unwrap();
    let duplicate = store
        .create_daily_checkin(DailyCheckin::new(owner.id, day(3), "great", 9))
        .await;
    assert!(matches!(duplicate, Err(StoreError::AlreadyExists { .. })));

    let today = store.get_daily_checkin(owner.id, day(3)).await.unwrap().unwrap();
    assert_eq!(today.energy_level, 7);
    assert_eq!(today.notes.as_deref(), Some("Slept well"));
    assert!(store.get_daily_checkin(owner.id, day(2)).await.unwrap().is_none());

    let history = store.list_daily_checkins(owner.id).await.unwrap();
    assert_eq!(
        history.iter().map(|c| c.date).collect::<Vec<_>>(),
        vec![day(1), day(3)]
    );

    let orphan = store
        .create_daily_checkin(DailyCheckin::new(Uuid::new_v4(), day(3), "ok", 5))
        .await;
    assert!(matches!(orphan, Err(StoreError::ForeignKeyViolation(_))));

    let mut dims = DimensionScores::new();
    dims.insert(Category::Fitness, DimensionScore::new(35));
    dims.insert(Category::Career, DimensionScore::new(80));

    store
        .create_progress_assessment(ProgressAssessment::new(owner.id, day(6), dims.clone(), 6))
        .await
        .unwrap();
    let second = store
        .create_progress_assessment(
            ProgressAssessment::new(owner.id, day(13), dims.clone(), 7).with_notes("Better week"),
        )
        .await
        .unwrap();
    let same_week = store
        .create_progress_assessment(ProgressAssessment::new(owner.id, day(13), dims, 8))
        .await;
    assert!(matches!(same_week, Err(StoreError::AlreadyExists { .. })));

    let latest = store
        .get_latest_progress_assessment(owner.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, second.id);
    assert_eq!(
        latest.dimensions.get(&Category::Fitness).map(|s| s.value()),
        Some(35)
    );

    let all = store.list_progress_assessments(owner.id).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].week_of, day(13));
}

pub async fn recommendations<S: AlignStore>(store: &S) {
    let owner = user(store, "recs@example.com").await;

    let make = |title: &str, priority: i32| {
        Recommendation::new(
            owner.id,
            title,
            "desc",
            "fitness",
            "impact",
            priority,
            RecommendationKind::Custom,
        )
    };

    store.create_recommendation(make("third", 3)).await.unwrap();
    let first = store.create_recommendation(make("first", 1)).await.unwrap();
    store.create_recommendation(make("second", 1)).await.unwrap();

    let listed = store.list_recommendations(owner.id, true).await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);

    let dismissed = store
        .update_recommendation(Recommendation {
            is_active: false,
            ..first
        })
        .await
        .unwrap();
    assert!(!dismissed.is_active);
    assert_eq!(store.list_recommendations(owner.id, true).await.unwrap().len(), 2);
    assert_eq!(store.list_recommendations(owner.id, false).await.unwrap().len(), 3);

    assert_eq!(store.deactivate_recommendations(owner.id).await.unwrap(), 2);
    assert!(store.list_recommendations(owner.id, true).await.unwrap().is_empty());
    assert_eq!(store.deactivate_recommendations(owner.id).await.unwrap(), 0);

    let missing = store.update_recommendation(make("ghost", 2)).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}

pub async fn community<S: AlignStore>(store: &S) {
    let author = user(store, "feed@example.com").await;

    let mut ids = Vec::new();
    for n in 0..4 {
        let update = store
            .create_community_update(CommunityUpdate::new(
                author.id,
                format!("post {n}"),
                UpdateType::Milestone,
            ))
            .await
            .unwrap();
        ids.push(update.id);
    }

    let recent = store.list_community_updates(3).await.unwrap();
    let contents: Vec<&str> = recent.iter().map(|u| u.content.as_str()).collect();
    assert_eq!(contents, vec!["post 3", "post 2", "post 1"]);
    assert_eq!(recent[0].update_type, UpdateType::Milestone);

    store.like_community_update(ids[0]).await.unwrap();
    let liked = store.like_community_update(ids[0]).await.unwrap();
    assert_eq!(liked.likes, 2);

    assert!(matches!(
        store.like_community_update(Uuid::new_v4()).await,
        Err(StoreError::NotFound { .. })
    ));
}

pub async fn cascade_delete<S: AlignStore>(store: &S) {
    let owner = user(store, "gone@example.com").await;
    let keeper = user(store, "stays@example.com").await;

    let blueprint = store
        .create_blueprint(Blueprint::new(owner.id, "goal", "state", vec![]))
        .await
        .unwrap();
    let habit = store
        .create_habit(Habit::new(owner.id, "Walk", "fitness").with_blueprint(blueprint.id))
        .await
        .unwrap();
    store
        .create_habit_completion(HabitCompletion::new(habit.id, owner.id, day(5)))
        .await
        .unwrap();
    store
        .create_daily_checkin(DailyCheckin::new(owner.id, day(5), "ok", 5))
        .await
        .unwrap();
    store
        .create_self_assessment(SelfAssessment::new(
            owner.id,
            AssessmentType::IdealSelf,
            DimensionScores::new(),
        ))
        .await
        .unwrap();
    store
        .create_accountability_buddy(AccountabilityBuddy::new(keeper.id, owner.id))
        .await
        .unwrap();
    store
        .create_community_update(CommunityUpdate::new(owner.id, "bye", UpdateType::General))
        .await
        .unwrap();
    store
        .create_community_update(CommunityUpdate::new(keeper.id, "hello", UpdateType::General))
        .await
        .unwrap();

    store.delete_user(owner.id).await.unwrap();

    assert!(store.get_blueprint(blueprint.id).await.unwrap().is_none());
    assert!(store.get_habit(habit.id).await.unwrap().is_none());
    assert!(store
        .list_habit_completions(CompletionFilter::for_user(owner.id))
        .await
        .unwrap()
        .is_empty());
    assert!(store.list_daily_checkins(owner.id).await.unwrap().is_empty());
    assert!(store.list_self_assessments(owner.id).await.unwrap().is_empty());
    assert!(store
        .list_accountability_buddies(keeper.id)
        .await
        .unwrap()
        .is_empty());

    let feed = store.list_community_updates(10).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].content, "hello");
}

pub async fn self_assessments<S: AlignStore>(store: &S) {
    let owner = user(store, "self@example.com").await;

    let mut answers = Map::new();
    answers.insert("fitness_goal".to_string(), Value::from("Run a half marathon"));
    let ideal = store
        .create_self_assessment(
            SelfAssessment::new(owner.id, AssessmentType::IdealSelf, DimensionScores::new())
                .with_responses(answers),
        )
        .await
        .unwrap();

    let scores = |fitness| {
        let mut dims = DimensionScores::new();
        dims.insert(Category::Fitness, DimensionScore::new(fitness));
        dims
    };
    store
        .create_self_assessment(SelfAssessment::new(
            owner.id,
            AssessmentType::CurrentSelf,
            scores(30),
        ))
        .await
        .unwrap();
    let newer = store
        .create_self_assessment(SelfAssessment::new(
            owner.id,
            AssessmentType::CurrentSelf,
            scores(55),
        ))
        .await
        .unwrap();

    let latest_current = store
        .get_latest_self_assessment(owner.id, AssessmentType::CurrentSelf)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest_current.id, newer.id);
    assert_eq!(
        latest_current.dimensions.get(&Category::Fitness).map(|s| s.value()),
        Some(55)
    );

    let latest_ideal = store
        .get_latest_self_assessment(owner.id, AssessmentType::IdealSelf)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest_ideal.id, ideal.id);
    assert_eq!(
        latest_ideal.responses.get("fitness_goal"),
        Some(&Value::from("Run a half marathon"))
    );

    let all = store.list_self_assessments(owner.id).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, newer.id);

    let stranger = Uuid::new_v4();
    assert!(store
        .get_latest_self_assessment(stranger, AssessmentType::CurrentSelf)
        .await
        .unwrap()
        .is_none());
    let orphan = store
        .create_self_assessment(SelfAssessment::new(
            stranger,
            AssessmentType::CurrentSelf,
            scores(10),
        ))
        .await;
    assert!(matches!(orphan, Err(StoreError::ForeignKeyViolation(_))));
}

pub async fn buddies<S: AlignStore>(store: &S) {
    let owner = user(store, "owner@example.com").await;
    let friend = user(store, "friend@example.com").await;
    let colleague = user(store, "colleague@example.com").await;
    let former = user(store, "former@example.com").await;

    let first = store
        .create_accountability_buddy(AccountabilityBuddy::new(owner.id, friend.id))
        .await
        .unwrap();
    store
        .create_accountability_buddy(
            AccountabilityBuddy::new(owner.id, former.id).with_status(BuddyStatus::Inactive),
        )
        .await
        .unwrap();
    store
        .create_accountability_buddy(AccountabilityBuddy::new(owner.id, colleague.id))
        .await
        .unwrap();

    let active = store.list_accountability_buddies(owner.id).await.unwrap();
    assert_eq!(
        active.iter().map(|b| b.buddy_id).collect::<Vec<_>>(),
        vec![friend.id, colleague.id]
    );
    assert_eq!(active[0].id, first.id);

    // Links are one-way.
    assert!(store
        .list_accountability_buddies(friend.id)
        .await
        .unwrap()
        .is_empty());

    let duplicate = store
        .create_accountability_buddy(AccountabilityBuddy::new(owner.id, friend.id))
        .await;
    assert!(matches!(duplicate, Err(StoreError::AlreadyExists { .. })));

    let unknown_buddy = store
        .create_accountability_buddy(AccountabilityBuddy::new(owner.id, Uuid::new_v4()))
        .await;
    assert!(matches!(unknown_buddy, Err(StoreError::ForeignKeyViolation(_))));
    let unknown_owner = store
        .create_accountability_buddy(AccountabilityBuddy::new(Uuid::new_v4(), friend.id))
        .await;
    assert!(matches!(unknown_owner, Err(StoreError::ForeignKeyViolation(_))));
}

/// Races 8 identical completions and 8 identical check-ins, returning
/// `(successes, conflicts)` across both. Any other error panics.
pub async fn concurrent_duplicates<S: AlignStore + 'static>(store: Arc<S>) -> (usize, usize) {
    let owner = user(store.as_ref(), "race@example.com").await;
    let habit = store
        .create_habit(Habit::new(owner.id, "Workout", "fitness"))
        .await
        .unwrap();
    let date = day(30);

    let mut attempts = Vec::new();
    for _ in 0..8 {
        let completion_store = Arc::clone(&store);
        let (habit_id, user_id) = (habit.id, owner.id);
        attempts.push(tokio::spawn(async move {
            completion_store
                .create_habit_completion(HabitCompletion::new(habit_id, user_id, date))
                .await
                .map(|_| ())
        }));

        let checkin_store = Arc::clone(&store);
        attempts.push(tokio::spawn(async move {
            checkin_store
                .create_daily_checkin(DailyCheckin::new(user_id, date, "good", 7))
                .await
                .map(|_| ())
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(()) => successes += 1,
            Err(StoreError::AlreadyExists { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(
        store
            .list_habit_completions(CompletionFilter::on_date(owner.id, date))
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(store.list_daily_checkins(owner.id).await.unwrap().len(), 1);
    (successes, conflicts)
}
