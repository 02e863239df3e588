//! In-memory store implementation for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use entities::{
    AccountabilityBuddy, AssessmentType, Blueprint, BuddyStatus, CommunityUpdate, DailyCheckin,
    Habit, HabitCompletion, ProgressAssessment, Recommendation, SelfAssessment, User,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{AlignStore, CompletionFilter, HabitFilter, StoreError, StoreResult};

/// Every table behind one lock, so uniqueness checks and cascades are atomic.
///
/// Owned tables are vectors to keep insertion order, which is the creation
/// order tie-break used by the listing operations.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    blueprints: Vec<Blueprint>,
    habits: Vec<Habit>,
    completions: Vec<HabitCompletion>,
    checkins: Vec<DailyCheckin>,
    self_assessments: Vec<SelfAssessment>,
    assessments: Vec<ProgressAssessment>,
    recommendations: Vec<Recommendation>,
    buddies: Vec<AccountabilityBuddy>,
    community_updates: Vec<CommunityUpdate>,
}

impl Tables {
    fn ensure_user(&self, user_id: Uuid) -> StoreResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::missing_user(user_id))
        }
    }
}

/// In-memory store. Starts empty; see [`crate::seed_demo_data`] for fixtures.
#[derive(Debug, Default)]
pub struct MemoryAlignStore {
    tables: RwLock<Tables>,
}

impl MemoryAlignStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlignStore for MemoryAlignStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::already_exists("User", user.id.to_string()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::already_exists("User", user.email));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::already_exists("User", user.email));
        }
        let existing = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| StoreError::not_found("User", user.id.to_string()))?;
        *existing = User {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..user
        };
        Ok(existing.clone())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(StoreError::not_found("User", id.to_string()));
        }
        tables.blueprints.retain(|b| b.user_id != id);
        tables.habits.retain(|h| h.user_id != id);
        tables.completions.retain(|c| c.user_id != id);
        tables.checkins.retain(|c| c.user_id != id);
        tables.self_assessments.retain(|a| a.user_id != id);
        tables.assessments.retain(|a| a.user_id != id);
        tables.recommendations.retain(|r| r.user_id != id);
        tables
            .buddies
            .retain(|b| b.user_id != id && b.buddy_id != id);
        tables.community_updates.retain(|u| u.user_id != id);
        tracing::debug!(user_id = %id, "Deleted user and owned records");
        Ok(())
    }

    // =========================================================================
    // Blueprint operations
    // =========================================================================

    async fn create_blueprint(&self, blueprint: Blueprint) -> StoreResult<Blueprint> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(blueprint.user_id)?;
        if tables.blueprints.iter().any(|b| b.id == blueprint.id) {
            return Err(StoreError::already_exists(
                "Blueprint",
                blueprint.id.to_string(),
            ));
        }
        tables.blueprints.push(blueprint.clone());
        Ok(blueprint)
    }

    async fn get_blueprint(&self, id: Uuid) -> StoreResult<Option<Blueprint>> {
        let tables = self.tables.read().await;
        Ok(tables.blueprints.iter().find(|b| b.id == id).cloned())
    }

    async fn get_latest_blueprint(&self, user_id: Uuid) -> StoreResult<Option<Blueprint>> {
        let tables = self.tables.read().await;
        Ok(tables
            .blueprints
            .iter()
            .rev()
            .find(|b| b.user_id == user_id)
            .cloned())
    }

    async fn list_blueprints(&self, user_id: Uuid) -> StoreResult<Vec<Blueprint>> {
        let tables = self.tables.read().await;
        Ok(tables
            .blueprints
            .iter()
            .rev()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_blueprint(&self, blueprint: Blueprint) -> StoreResult<Blueprint> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .blueprints
            .iter_mut()
            .find(|b| b.id == blueprint.id)
            .ok_or_else(|| StoreError::not_found("Blueprint", blueprint.id.to_string()))?;
        *existing = Blueprint {
            user_id: existing.user_id,
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..blueprint
        };
        Ok(existing.clone())
    }

    // =========================================================================
    // Habit operations
    // =========================================================================

    async fn create_habit(&self, habit: Habit) -> StoreResult<Habit> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(habit.user_id)?;
        if tables.habits.iter().any(|h| h.id == habit.id) {
            return Err(StoreError::already_exists("Habit", habit.id.to_string()));
        }
        if let Some(blueprint_id) = habit.blueprint_id {
            if !tables.blueprints.iter().any(|b| b.id == blueprint_id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "blueprint {blueprint_id} does not exist"
                )));
            }
        }
        tables.habits.push(habit.clone());
        Ok(habit)
    }

    async fn get_habit(&self, id: Uuid) -> StoreResult<Option<Habit>> {
        let tables = self.tables.read().await;
        Ok(tables.habits.iter().find(|h| h.id == id).cloned())
    }

    async fn list_habits(&self, filter: HabitFilter) -> StoreResult<Vec<Habit>> {
        let tables = self.tables.read().await;
        let mut result: Vec<Habit> = tables
            .habits
            .iter()
            .filter(|h| filter.matches(h))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.category.cmp(&b.category).then(a.title.cmp(&b.title)));
        Ok(result)
    }

    async fn update_habit(&self, habit: Habit) -> StoreResult<Habit> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .habits
            .iter_mut()
            .find(|h| h.id == habit.id)
            .ok_or_else(|| StoreError::not_found("Habit", habit.id.to_string()))?;
        *existing = Habit {
            user_id: existing.user_id,
            created_at: existing.created_at,
            ..habit
        };
        Ok(existing.clone())
    }

    async fn deactivate_habit(&self, id: Uuid) -> StoreResult<Habit> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| StoreError::not_found("Habit", id.to_string()))?;
        existing.is_active = false;
        Ok(existing.clone())
    }

    // =========================================================================
    // Habit completion operations
    // =========================================================================

    async fn create_habit_completion(
        &self,
        completion: HabitCompletion,
    ) -> StoreResult<HabitCompletion> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(completion.user_id)?;
        let owned = tables
            .habits
            .iter()
            .any(|h| h.id == completion.habit_id && h.user_id == completion.user_id);
        if !owned {
            return Err(StoreError::not_found(
                "Habit",
                completion.habit_id.to_string(),
            ));
        }
        let duplicate = tables
            .completions
            .iter()
            .any(|c| c.habit_id == completion.habit_id && c.date == completion.date);
        if duplicate {
            return Err(StoreError::already_exists(
                "HabitCompletion",
                format!("{}@{}", completion.habit_id, completion.date),
            ));
        }
        tables.completions.push(completion.clone());
        Ok(completion)
    }

    async fn delete_habit_completion(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.completions.len();
        tables
            .completions
            .retain(|c| !(c.habit_id == habit_id && c.user_id == user_id && c.date == date));
        if tables.completions.len() == before {
            return Err(StoreError::not_found(
                "HabitCompletion",
                format!("{habit_id}@{date}"),
            ));
        }
        Ok(())
    }

    async fn list_habit_completions(
        &self,
        filter: CompletionFilter,
    ) -> StoreResult<Vec<HabitCompletion>> {
        let tables = self.tables.read().await;
        let mut result: Vec<HabitCompletion> = tables
            .completions
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        result.sort_by_key(|c| c.date);
        Ok(result)
    }

    // =========================================================================
    // Daily check-in operations
    // =========================================================================

    async fn create_daily_checkin(&self, checkin: DailyCheckin) -> StoreResult<DailyCheckin> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(checkin.user_id)?;
        let duplicate = tables
            .checkins
            .iter()
            .any(|c| c.user_id == checkin.user_id && c.date == checkin.date);
        if duplicate {
            return Err(StoreError::already_exists(
                "DailyCheckin",
                format!("{}@{}", checkin.user_id, checkin.date),
            ));
        }
        tables.checkins.push(checkin.clone());
        Ok(checkin)
    }

    async fn get_daily_checkin(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<DailyCheckin>> {
        let tables = self.tables.read().await;
        Ok(tables
            .checkins
            .iter()
            .find(|c| c.user_id == user_id && c.date == date)
            .cloned())
    }

    async fn list_daily_checkins(&self, user_id: Uuid) -> StoreResult<Vec<DailyCheckin>> {
        let tables = self.tables.read().await;
        let mut result: Vec<DailyCheckin> = tables
            .checkins
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.date);
        Ok(result)
    }

    // =========================================================================
    // Self-assessment operations
    // =========================================================================

    async fn create_self_assessment(
        &self,
        assessment: SelfAssessment,
    ) -> StoreResult<SelfAssessment> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(assessment.user_id)?;
        if tables.self_assessments.iter().any(|a| a.id == assessment.id) {
            return Err(StoreError::already_exists(
                "SelfAssessment",
                assessment.id.to_string(),
            ));
        }
        tables.self_assessments.push(assessment.clone());
        Ok(assessment)
    }

    async fn list_self_assessments(&self, user_id: Uuid) -> StoreResult<Vec<SelfAssessment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .self_assessments
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_latest_self_assessment(
        &self,
        user_id: Uuid,
        assessment_type: AssessmentType,
    ) -> StoreResult<Option<SelfAssessment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .self_assessments
            .iter()
            .rev()
            .find(|a| a.user_id == user_id && a.assessment_type == assessment_type)
            .cloned())
    }

    // =========================================================================
    // Progress assessment operations
    // =========================================================================

    async fn create_progress_assessment(
        &self,
        assessment: ProgressAssessment,
    ) -> StoreResult<ProgressAssessment> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(assessment.user_id)?;
        let duplicate = tables
            .assessments
            .iter()
            .any(|a| a.user_id == assessment.user_id && a.week_of == assessment.week_of);
        if duplicate {
            return Err(StoreError::already_exists(
                "ProgressAssessment",
                format!("{}@{}", assessment.user_id, assessment.week_of),
            ));
        }
        tables.assessments.push(assessment.clone());
        Ok(assessment)
    }

    async fn list_progress_assessments(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<ProgressAssessment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assessments
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_latest_progress_assessment(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Option<ProgressAssessment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assessments
            .iter()
            .rev()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    // =========================================================================
    // Recommendation operations
    // =========================================================================

    async fn create_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> StoreResult<Recommendation> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(recommendation.user_id)?;
        if tables
            .recommendations
            .iter()
            .any(|r| r.id == recommendation.id)
        {
            return Err(StoreError::already_exists(
                "Recommendation",
                recommendation.id.to_string(),
            ));
        }
        tables.recommendations.push(recommendation.clone());
        Ok(recommendation)
    }

    async fn get_recommendation(&self, id: Uuid) -> StoreResult<Option<Recommendation>> {
        let tables = self.tables.read().await;
        Ok(tables.recommendations.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recommendations(
        &self,
        user_id: Uuid,
        active_only: bool,
    ) -> StoreResult<Vec<Recommendation>> {
        let tables = self.tables.read().await;
        let mut result: Vec<Recommendation> = tables
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id && (!active_only || r.is_active))
            .cloned()
            .collect();
        // Stable sort keeps insertion order within a priority.
        result.sort_by_key(|r| r.priority);
        Ok(result)
    }

    async fn update_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> StoreResult<Recommendation> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .recommendations
            .iter_mut()
            .find(|r| r.id == recommendation.id)
            .ok_or_else(|| {
                StoreError::not_found("Recommendation", recommendation.id.to_string())
            })?;
        *existing = Recommendation {
            user_id: existing.user_id,
            created_at: existing.created_at,
            ..recommendation
        };
        Ok(existing.clone())
    }

    async fn deactivate_recommendations(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for rec in tables
            .recommendations
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.is_active)
        {
            rec.is_active = false;
            changed += 1;
        }
        Ok(changed)
    }

    // =========================================================================
    // Accountability buddy operations
    // =========================================================================

    async fn create_accountability_buddy(
        &self,
        buddy: AccountabilityBuddy,
    ) -> StoreResult<AccountabilityBuddy> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(buddy.user_id)?;
        tables.ensure_user(buddy.buddy_id)?;
        let duplicate = tables
            .buddies
            .iter()
            .any(|b| b.user_id == buddy.user_id && b.buddy_id == buddy.buddy_id);
        if duplicate {
            return Err(StoreError::already_exists(
                "AccountabilityBuddy",
                format!("{}->{}", buddy.user_id, buddy.buddy_id),
            ));
        }
        tables.buddies.push(buddy.clone());
        Ok(buddy)
    }

    async fn list_accountability_buddies(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<AccountabilityBuddy>> {
        let tables = self.tables.read().await;
        Ok(tables
            .buddies
            .iter()
            .filter(|b| b.user_id == user_id && b.status == BuddyStatus::Active)
            .cloned()
            .collect())
    }

    // =========================================================================
    // Community operations
    // =========================================================================

    async fn create_community_update(
        &self,
        update: CommunityUpdate,
    ) -> StoreResult<CommunityUpdate> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(update.user_id)?;
        tables.community_updates.push(update.clone());
        Ok(update)
    }

    async fn list_community_updates(&self, limit: u32) -> StoreResult<Vec<CommunityUpdate>> {
        let tables = self.tables.read().await;
        Ok(tables
            .community_updates
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn like_community_update(&self, id: Uuid) -> StoreResult<CommunityUpdate> {
        let mut tables = self.tables.write().await;
        let update = tables
            .community_updates
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("CommunityUpdate", id.to_string()))?;
        update.likes += 1;
        Ok(update.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::conformance;

    #[tokio::test]
    async fn test_conformance_users() {
        conformance::user_lifecycle(&MemoryAlignStore::new()).await;
    }

    #[tokio::test]
    async fn test_conformance_blueprints_and_habits() {
        conformance::blueprints_and_habits(&MemoryAlignStore::new()).await;
    }

    #[tokio::test]
    async fn test_conformance_completions() {
        conformance::completion_uniqueness(&MemoryAlignStore::new()).await;
        conformance::completion_queries(&MemoryAlignStore::new()).await;
    }

    #[tokio::test]
    async fn test_conformance_checkins_and_assessments() {
        conformance::checkins_and_assessments(&MemoryAlignStore::new()).await;
    }

    #[tokio::test]
    async fn test_conformance_self_assessments() {
        conformance::self_assessments(&MemoryAlignStore::new()).await;
    }

    #[tokio::test]
    async fn test_conformance_recommendations_and_community() {
        conformance::recommendations(&MemoryAlignStore::new()).await;
        conformance::community(&MemoryAlignStore::new()).await;
    }

    #[tokio::test]
    async fn test_conformance_buddies() {
        conformance::buddies(&MemoryAlignStore::new()).await;
    }

    #[tokio::test]
    async fn test_conformance_cascade() {
        conformance::cascade_delete(&MemoryAlignStore::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_writes() {
        let store = Arc::new(MemoryAlignStore::new());
        let (successes, conflicts) = conformance::concurrent_duplicates(store).await;
        assert_eq!(successes, 2);
        assert_eq!(conflicts, 14);
    }
}
