//! Store trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;
use entities::{
    AccountabilityBuddy, AssessmentType, Blueprint, CommunityUpdate, DailyCheckin, Habit,
    HabitCompletion, ProgressAssessment, Recommendation, SelfAssessment, User,
};
use uuid::Uuid;

use crate::StoreResult;

/// Filter options for listing habits.
#[derive(Debug, Clone, Default)]
pub struct HabitFilter {
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Filter by blueprint.
    pub blueprint_id: Option<Uuid>,
    /// Include deactivated habits.
    pub include_inactive: bool,
}

impl HabitFilter {
    /// Active habits owned by a user.
    pub fn active_for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    /// Active habits created for a blueprint.
    pub fn active_for_blueprint(blueprint_id: Uuid) -> Self {
        Self {
            blueprint_id: Some(blueprint_id),
            ..Default::default()
        }
    }

    pub(crate) fn matches(&self, habit: &Habit) -> bool {
        self.user_id.is_none_or(|id| habit.user_id == id)
            && self
                .blueprint_id
                .is_none_or(|id| habit.blueprint_id == Some(id))
            && (self.include_inactive || habit.is_active)
    }
}

/// Filter options for listing habit completions.
///
/// Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct CompletionFilter {
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Filter by habit.
    pub habit_id: Option<Uuid>,
    /// Earliest date.
    pub start_date: Option<NaiveDate>,
    /// Latest date.
    pub end_date: Option<NaiveDate>,
}

impl CompletionFilter {
    /// Completions of a user on a single date.
    pub fn on_date(user_id: Uuid, date: NaiveDate) -> Self {
        Self::between(user_id, date, date)
    }

    /// Completions of a user in an inclusive date range.
    pub fn between(user_id: Uuid, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            user_id: Some(user_id),
            habit_id: None,
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    /// Full history of a user.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub(crate) fn matches(&self, completion: &HabitCompletion) -> bool {
        self.user_id.is_none_or(|id| completion.user_id == id)
            && self.habit_id.is_none_or(|id| completion.habit_id == id)
            && self.start_date.is_none_or(|d| completion.date >= d)
            && self.end_date.is_none_or(|d| completion.date <= d)
    }
}

/// Trait for LifeAlign storage operations.
///
/// Reads return owned snapshots and `None` for unknown ids. Updates and
/// deletes of unknown ids fail with `NotFound`. Creating an entity whose
/// owner does not exist fails with `ForeignKeyViolation`.
#[async_trait]
pub trait AlignStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Updates a user's profile fields.
    async fn update_user(&self, user: User) -> StoreResult<User>;

    /// Deletes a user and everything it owns, including buddy links that
    /// point at it.
    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Blueprint operations
    // =========================================================================

    /// Creates a new blueprint.
    async fn create_blueprint(&self, blueprint: Blueprint) -> StoreResult<Blueprint>;

    /// Gets a blueprint by ID.
    async fn get_blueprint(&self, id: Uuid) -> StoreResult<Option<Blueprint>>;

    /// Gets the most recently created blueprint of a user.
    async fn get_latest_blueprint(&self, user_id: Uuid) -> StoreResult<Option<Blueprint>>;

    /// Lists a user's blueprints, newest first.
    async fn list_blueprints(&self, user_id: Uuid) -> StoreResult<Vec<Blueprint>>;

    /// Updates a blueprint's goal, state and focus areas.
    async fn update_blueprint(&self, blueprint: Blueprint) -> StoreResult<Blueprint>;

    // =========================================================================
    // Habit operations
    // =========================================================================

    /// Creates a new habit.
    async fn create_habit(&self, habit: Habit) -> StoreResult<Habit>;

    /// Gets a habit by ID, active or not.
    async fn get_habit(&self, id: Uuid) -> StoreResult<Option<Habit>>;

    /// Lists habits ordered by category then title.
    async fn list_habits(&self, filter: HabitFilter) -> StoreResult<Vec<Habit>>;

    /// Updates a habit's mutable fields.
    async fn update_habit(&self, habit: Habit) -> StoreResult<Habit>;

    /// Soft-deletes a habit. Its completions are kept.
    async fn deactivate_habit(&self, id: Uuid) -> StoreResult<Habit>;

    // =========================================================================
    // Habit completion operations
    // =========================================================================

    /// Records a completion. Fails with `AlreadyExists` if the habit is
    /// already completed on that date.
    async fn create_habit_completion(
        &self,
        completion: HabitCompletion,
    ) -> StoreResult<HabitCompletion>;

    /// Removes the completion of a habit on a date.
    async fn delete_habit_completion(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<()>;

    /// Lists completions ordered by date.
    async fn list_habit_completions(
        &self,
        filter: CompletionFilter,
    ) -> StoreResult<Vec<HabitCompletion>>;

    // =========================================================================
    // Daily check-in operations
    // =========================================================================

    /// Records a check-in. Fails with `AlreadyExists` if the user already
    /// checked in on that date.
    async fn create_daily_checkin(&self, checkin: DailyCheckin) -> StoreResult<DailyCheckin>;

    /// Gets a user's check-in for a date.
    async fn get_daily_checkin(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<DailyCheckin>>;

    /// Lists a user's check-ins in ascending date order.
    async fn list_daily_checkins(&self, user_id: Uuid) -> StoreResult<Vec<DailyCheckin>>;

    // =========================================================================
    // Self-assessment operations
    // =========================================================================

    /// Records a self-assessment.
    async fn create_self_assessment(
        &self,
        assessment: SelfAssessment,
    ) -> StoreResult<SelfAssessment>;

    /// Lists a user's self-assessments, newest first.
    async fn list_self_assessments(&self, user_id: Uuid) -> StoreResult<Vec<SelfAssessment>>;

    /// Gets a user's most recent self-assessment of one type.
    async fn get_latest_self_assessment(
        &self,
        user_id: Uuid,
        assessment_type: AssessmentType,
    ) -> StoreResult<Option<SelfAssessment>>;

    // =========================================================================
    // Progress assessment operations
    // =========================================================================

    /// Records an assessment. Fails with `AlreadyExists` if the user already
    /// assessed that week.
    async fn create_progress_assessment(
        &self,
        assessment: ProgressAssessment,
    ) -> StoreResult<ProgressAssessment>;

    /// Lists a user's assessments, newest first.
    async fn list_progress_assessments(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<ProgressAssessment>>;

    /// Gets a user's most recent assessment.
    async fn get_latest_progress_assessment(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Option<ProgressAssessment>>;

    // =========================================================================
    // Recommendation operations
    // =========================================================================

    /// Stores a recommendation.
    async fn create_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> StoreResult<Recommendation>;

    /// Gets a recommendation by ID.
    async fn get_recommendation(&self, id: Uuid) -> StoreResult<Option<Recommendation>>;

    /// Lists a user's recommendations by priority, then creation order.
    async fn list_recommendations(
        &self,
        user_id: Uuid,
        active_only: bool,
    ) -> StoreResult<Vec<Recommendation>>;

    /// Updates a recommendation's mutable fields.
    async fn update_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> StoreResult<Recommendation>;

    /// Deactivates every active recommendation of a user, returning how many
    /// changed.
    async fn deactivate_recommendations(&self, user_id: Uuid) -> StoreResult<u64>;

    // =========================================================================
    // Accountability buddy operations
    // =========================================================================

    /// Links a user to a buddy. Both must exist. Fails with `AlreadyExists`
    /// if the pair is already linked.
    async fn create_accountability_buddy(
        &self,
        buddy: AccountabilityBuddy,
    ) -> StoreResult<AccountabilityBuddy>;

    /// Lists a user's active buddy links in creation order.
    async fn list_accountability_buddies(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<AccountabilityBuddy>>;

    // =========================================================================
    // Community operations
    // =========================================================================

    /// Publishes a community update.
    async fn create_community_update(
        &self,
        update: CommunityUpdate,
    ) -> StoreResult<CommunityUpdate>;

    /// Lists the most recent community updates.
    async fn list_community_updates(&self, limit: u32) -> StoreResult<Vec<CommunityUpdate>>;

    /// Increments the like counter of an update.
    async fn like_community_update(&self, id: Uuid) -> StoreResult<CommunityUpdate>;
}
