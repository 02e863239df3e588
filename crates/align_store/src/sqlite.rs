//! SQLite store implementation.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use entities::{
    AccountabilityBuddy, AssessmentType, Blueprint, BuddyStatus, CommunityUpdate, DailyCheckin,
    Habit, HabitCompletion, ProgressAssessment, Recommendation, RecommendationKind,
    SelfAssessment, UpdateType, User,
};
use sqlx::{
    ConnectOptions, FromRow, Pool, QueryBuilder, Sqlite,
    sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{AlignStore, CompletionFilter, HabitFilter, StoreError, StoreResult};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT,
    first_name TEXT,
    last_name TEXT,
    profile_image_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS blueprints (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    identity_goal TEXT NOT NULL,
    current_state TEXT NOT NULL,
    focus_areas TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS habits (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    blueprint_id TEXT REFERENCES blueprints(id) ON DELETE SET NULL,
    title TEXT NOT NULL,
    description TEXT,
    category TEXT NOT NULL,
    focus_area TEXT,
    duration_minutes INTEGER,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS habit_completions (
    id TEXT PRIMARY KEY,
    habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    completed_at TEXT NOT NULL,
    UNIQUE (habit_id, date)
);

CREATE TABLE IF NOT EXISTS daily_checkins (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    mood TEXT NOT NULL,
    energy_level INTEGER NOT NULL,
    notes TEXT,
    completed_at TEXT NOT NULL,
    UNIQUE (user_id, date)
);

CREATE TABLE IF NOT EXISTS self_assessments (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    assessment_type TEXT NOT NULL,
    dimensions TEXT NOT NULL,
    responses TEXT NOT NULL,
    completed_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS progress_assessments (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    blueprint_id TEXT REFERENCES blueprints(id) ON DELETE SET NULL,
    week_of TEXT NOT NULL,
    dimensions TEXT NOT NULL,
    overall_rating INTEGER NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, week_of)
);

CREATE TABLE IF NOT EXISTS recommendations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    impact TEXT NOT NULL,
    priority INTEGER NOT NULL,
    kind TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accountability_buddies (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    buddy_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, buddy_id)
);

CREATE TABLE IF NOT EXISTS community_updates (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    update_type TEXT NOT NULL,
    likes INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_habits_user ON habits (user_id);
CREATE INDEX IF NOT EXISTS idx_completions_user_date ON habit_completions (user_id, date);
CREATE INDEX IF NOT EXISTS idx_recommendations_user ON recommendations (user_id, priority);
CREATE INDEX IF NOT EXISTS idx_self_assessments_user ON self_assessments (user_id, assessment_type);
CREATE INDEX IF NOT EXISTS idx_buddies_buddy ON accountability_buddies (buddy_id);
"#;

// =============================================================================
// Row conversions
// =============================================================================

fn parse_uuid(value: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| StoreError::InvalidData(format!("uuid {value}: {e}")))
}

fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("timestamp {value}: {e}")))
}

fn parse_date(value: &str) -> StoreResult<NaiveDate> {
    NaiveDate::from_str(value).map_err(|e| StoreError::InvalidData(format!("date {value}: {e}")))
}

fn parse_optional_uuid(value: Option<String>) -> StoreResult<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    email: String,
    display_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_image_url: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> StoreResult<Self> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            email: row.email,
            display_name: row.display_name,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_image_url: row.profile_image_url,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct BlueprintRow {
    id: String,
    user_id: String,
    identity_goal: String,
    current_state: String,
    focus_areas: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BlueprintRow> for Blueprint {
    type Error = StoreError;

    fn try_from(row: BlueprintRow) -> StoreResult<Self> {
        Ok(Blueprint {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            identity_goal: row.identity_goal,
            current_state: row.current_state,
            focus_areas: serde_json::from_str(&row.focus_areas)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct HabitRow {
    id: String,
    user_id: String,
    blueprint_id: Option<String>,
    title: String,
    description: Option<String>,
    category: String,
    focus_area: Option<String>,
    duration_minutes: Option<i64>,
    is_active: bool,
    created_at: String,
}

impl TryFrom<HabitRow> for Habit {
    type Error = StoreError;

    fn try_from(row: HabitRow) -> StoreResult<Self> {
        Ok(Habit {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            blueprint_id: parse_optional_uuid(row.blueprint_id)?,
            title: row.title,
            description: row.description,
            category: row.category,
            focus_area: row.focus_area,
            duration_minutes: row.duration_minutes.map(|m| m.max(0) as u32),
            is_active: row.is_active,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct CompletionRow {
    id: String,
    habit_id: String,
    user_id: String,
    date: String,
    completed_at: String,
}

impl TryFrom<CompletionRow> for HabitCompletion {
    type Error = StoreError;

    fn try_from(row: CompletionRow) -> StoreResult<Self> {
        Ok(HabitCompletion {
            id: parse_uuid(&row.id)?,
            habit_id: parse_uuid(&row.habit_id)?,
            user_id: parse_uuid(&row.user_id)?,
            date: parse_date(&row.date)?,
            completed_at: parse_timestamp(&row.completed_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct CheckinRow {
    id: String,
    user_id: String,
    date: String,
    mood: String,
    energy_level: i64,
    notes: Option<String>,
    completed_at: String,
}

impl TryFrom<CheckinRow> for DailyCheckin {
    type Error = StoreError;

    fn try_from(row: CheckinRow) -> StoreResult<Self> {
        Ok(DailyCheckin {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            date: parse_date(&row.date)?,
            mood: row.mood,
            energy_level: u8::try_from(row.energy_level)
                .map_err(|_| StoreError::InvalidData(format!("energy {}", row.energy_level)))?,
            notes: row.notes,
            completed_at: parse_timestamp(&row.completed_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct SelfAssessmentRow {
    id: String,
    user_id: String,
    assessment_type: String,
    dimensions: String,
    responses: String,
    completed_at: String,
}

impl TryFrom<SelfAssessmentRow> for SelfAssessment {
    type Error = StoreError;

    fn try_from(row: SelfAssessmentRow) -> StoreResult<Self> {
        Ok(SelfAssessment {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            assessment_type: AssessmentType::from_str(&row.assessment_type)
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
            dimensions: serde_json::from_str(&row.dimensions)?,
            responses: serde_json::from_str(&row.responses)?,
            completed_at: parse_timestamp(&row.completed_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct AssessmentRow {
    id: String,
    user_id: String,
    blueprint_id: Option<String>,
    week_of: String,
    dimensions: String,
    overall_rating: i64,
    notes: Option<String>,
    created_at: String,
}

impl TryFrom<AssessmentRow> for ProgressAssessment {
    type Error = StoreError;

    fn try_from(row: AssessmentRow) -> StoreResult<Self> {
        Ok(ProgressAssessment {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            blueprint_id: parse_optional_uuid(row.blueprint_id)?,
            week_of: parse_date(&row.week_of)?,
            dimensions: serde_json::from_str(&row.dimensions)?,
            overall_rating: u8::try_from(row.overall_rating)
                .map_err(|_| StoreError::InvalidData(format!("rating {}", row.overall_rating)))?,
            notes: row.notes,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct RecommendationRow {
    id: String,
    user_id: String,
    title: String,
    description: String,
    category: String,
    impact: String,
    priority: i64,
    kind: String,
    is_active: bool,
    created_at: String,
}

impl TryFrom<RecommendationRow> for Recommendation {
    type Error = StoreError;

    fn try_from(row: RecommendationRow) -> StoreResult<Self> {
        Ok(Recommendation {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            title: row.title,
            description: row.description,
            category: row.category,
            impact: row.impact,
            priority: row.priority as i32,
            kind: RecommendationKind::parse(&row.kind)
                .ok_or_else(|| StoreError::InvalidData(format!("kind {}", row.kind)))?,
            is_active: row.is_active,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct BuddyRow {
    id: String,
    user_id: String,
    buddy_id: String,
    status: String,
    created_at: String,
}

impl TryFrom<BuddyRow> for AccountabilityBuddy {
    type Error = StoreError;

    fn try_from(row: BuddyRow) -> StoreResult<Self> {
        Ok(AccountabilityBuddy {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            buddy_id: parse_uuid(&row.buddy_id)?,
            status: BuddyStatus::parse(&row.status)
                .ok_or_else(|| StoreError::InvalidData(format!("status {}", row.status)))?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct CommunityUpdateRow {
    id: String,
    user_id: String,
    content: String,
    update_type: String,
    likes: i64,
    created_at: String,
}

impl TryFrom<CommunityUpdateRow> for CommunityUpdate {
    type Error = StoreError;

    fn try_from(row: CommunityUpdateRow) -> StoreResult<Self> {
        Ok(CommunityUpdate {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            content: row.content,
            update_type: UpdateType::parse(&row.update_type)
                .ok_or_else(|| StoreError::InvalidData(format!("type {}", row.update_type)))?,
            likes: row.likes.max(0) as u32,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Maps constraint failures onto the store's error taxonomy.
fn map_write_error(err: sqlx::Error, entity_type: &'static str, key: String) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::already_exists(entity_type, key);
        }
        if db.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation(format!("{entity_type} {key}: {db}"));
        }
    }
    StoreError::Database(err)
}

// =============================================================================
// Store
// =============================================================================

/// SQLite-backed store. Foreign keys cascade owner deletion and unique
/// indexes enforce one completion per habit and date, one check-in per user
/// and date, and one assessment per user and week.
#[derive(Debug, Clone)]
pub struct SqliteAlignStore {
    pool: Pool<Sqlite>,
    /// Keeps an in-memory database alive while pool connections come and go.
    _anchor: Option<Arc<Mutex<SqliteConnection>>>,
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl SqliteAlignStore {
    /// Connects to `url` (e.g. `sqlite:lifealign.db` or `sqlite::memory:`)
    /// and creates the schema.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let store = if is_in_memory(url) {
            // The database is dropped when its last connection closes.
            let anchor = options.connect().await?;
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            Self {
                pool,
                _anchor: Some(Arc::new(Mutex::new(anchor))),
            }
        } else {
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?;
            Self::new(pool)
        };

        store.init().await?;
        Ok(store)
    }

    /// Wraps an existing pool. Call [`Self::init`] before use.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            _anchor: None,
        }
    }

    /// Creates tables and indexes if they do not exist.
    pub async fn init(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("SQLite schema ready");
        Ok(())
    }

    async fn user_exists(&self, user_id: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

const USER_COLUMNS: &str = "id, email, display_name, first_name, last_name, profile_image_url, created_at, updated_at";
const BLUEPRINT_COLUMNS: &str =
    "id, user_id, identity_goal, current_state, focus_areas, created_at, updated_at";
const HABIT_COLUMNS: &str = "id, user_id, blueprint_id, title, description, category, focus_area, duration_minutes, is_active, created_at";
const CHECKIN_COLUMNS: &str = "id, user_id, date, mood, energy_level, notes, completed_at";
const SELF_ASSESSMENT_COLUMNS: &str =
    "id, user_id, assessment_type, dimensions, responses, completed_at";
const BUDDY_COLUMNS: &str = "id, user_id, buddy_id, status, created_at";
const ASSESSMENT_COLUMNS: &str =
    "id, user_id, blueprint_id, week_of, dimensions, overall_rating, notes, created_at";
const RECOMMENDATION_COLUMNS: &str =
    "id, user_id, title, description, category, impact, priority, kind, is_active, created_at";
const COMMUNITY_COLUMNS: &str = "id, user_id, content, update_type, likes, created_at";

#[async_trait]
impl AlignStore for SqliteAlignStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        sqlx::query(
            "INSERT INTO users (id, email, display_name, first_name, last_name, profile_image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User", user.email.clone()))?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let updated_at = Utc::now();
        let result = sqlx::query(
            "UPDATE users SET email = ?, display_name = ?, first_name = ?, last_name = ?,
                 profile_image_url = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .bind(updated_at.to_rfc3339())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User", user.email.clone()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user.id.to_string()));
        }
        self.get_user(user.id)
            .await?
            .ok_or_else(|| StoreError::not_found("User", user.id.to_string()))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", id.to_string()));
        }
        tracing::debug!(user_id = %id, "Deleted user and owned records");
        Ok(())
    }

    // =========================================================================
    // Blueprint operations
    // =========================================================================

    async fn create_blueprint(&self, blueprint: Blueprint) -> StoreResult<Blueprint> {
        sqlx::query(
            "INSERT INTO blueprints (id, user_id, identity_goal, current_state, focus_areas, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(blueprint.id.to_string())
        .bind(blueprint.user_id.to_string())
        .bind(&blueprint.identity_goal)
        .bind(&blueprint.current_state)
        .bind(serde_json::to_string(&blueprint.focus_areas)?)
        .bind(blueprint.created_at.to_rfc3339())
        .bind(blueprint.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Blueprint", blueprint.id.to_string()))?;
        Ok(blueprint)
    }

    async fn get_blueprint(&self, id: Uuid) -> StoreResult<Option<Blueprint>> {
        let row: Option<BlueprintRow> = sqlx::query_as(&format!(
            "SELECT {BLUEPRINT_COLUMNS} FROM blueprints WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Blueprint::try_from).transpose()
    }

    async fn get_latest_blueprint(&self, user_id: Uuid) -> StoreResult<Option<Blueprint>> {
        let row: Option<BlueprintRow> = sqlx::query_as(&format!(
            "SELECT {BLUEPRINT_COLUMNS} FROM blueprints WHERE user_id = ?
             ORDER BY rowid DESC LIMIT 1"
        ))
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Blueprint::try_from).transpose()
    }

    async fn list_blueprints(&self, user_id: Uuid) -> StoreResult<Vec<Blueprint>> {
        let rows: Vec<BlueprintRow> = sqlx::query_as(&format!(
            "SELECT {BLUEPRINT_COLUMNS} FROM blueprints WHERE user_id = ?
             ORDER BY rowid DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn update_blueprint(&self, blueprint: Blueprint) -> StoreResult<Blueprint> {
        let result = sqlx::query(
            "UPDATE blueprints SET identity_goal = ?, current_state = ?, focus_areas = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&blueprint.identity_goal)
        .bind(&blueprint.current_state)
        .bind(serde_json::to_string(&blueprint.focus_areas)?)
        .bind(Utc::now().to_rfc3339())
        .bind(blueprint.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Blueprint", blueprint.id.to_string()));
        }
        self.get_blueprint(blueprint.id)
            .await?
            .ok_or_else(|| StoreError::not_found("Blueprint", blueprint.id.to_string()))
    }

    // =========================================================================
    // Habit operations
    // =========================================================================

    async fn create_habit(&self, habit: Habit) -> StoreResult<Habit> {
        sqlx::query(
            "INSERT INTO habits (id, user_id, blueprint_id, title, description, category, focus_area, duration_minutes, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(habit.id.to_string())
        .bind(habit.user_id.to_string())
        .bind(habit.blueprint_id.map(|id| id.to_string()))
        .bind(&habit.title)
        .bind(&habit.description)
        .bind(&habit.category)
        .bind(&habit.focus_area)
        .bind(habit.duration_minutes.map(i64::from))
        .bind(habit.is_active)
        .bind(habit.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Habit", habit.id.to_string()))?;
        Ok(habit)
    }

    async fn get_habit(&self, id: Uuid) -> StoreResult<Option<Habit>> {
        let row: Option<HabitRow> =
            sqlx::query_as(&format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Habit::try_from).transpose()
    }

    async fn list_habits(&self, filter: HabitFilter) -> StoreResult<Vec<Habit>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE 1 = 1"
        ));
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        if let Some(blueprint_id) = filter.blueprint_id {
            query
                .push(" AND blueprint_id = ")
                .push_bind(blueprint_id.to_string());
        }
        if !filter.include_inactive {
            query.push(" AND is_active = 1");
        }
        query.push(" ORDER BY category, title");

        let rows: Vec<HabitRow> = query.build_query_as().fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn update_habit(&self, habit: Habit) -> StoreResult<Habit> {
        let result = sqlx::query(
            "UPDATE habits SET blueprint_id = ?, title = ?, description = ?, category = ?,
                 focus_area = ?, duration_minutes = ?, is_active = ?
             WHERE id = ?",
        )
        .bind(habit.blueprint_id.map(|id| id.to_string()))
        .bind(&habit.title)
        .bind(&habit.description)
        .bind(&habit.category)
        .bind(&habit.focus_area)
        .bind(habit.duration_minutes.map(i64::from))
        .bind(habit.is_active)
        .bind(habit.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Habit", habit.id.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Habit", habit.id.to_string()));
        }
        self.get_habit(habit.id)
            .await?
            .ok_or_else(|| StoreError::not_found("Habit", habit.id.to_string()))
    }

    async fn deactivate_habit(&self, id: Uuid) -> StoreResult<Habit> {
        let result = sqlx::query("UPDATE habits SET is_active = 0 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Habit", id.to_string()));
        }
        self.get_habit(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Habit", id.to_string()))
    }

    // =========================================================================
    // Habit completion operations
    // =========================================================================

    async fn create_habit_completion(
        &self,
        completion: HabitCompletion,
    ) -> StoreResult<HabitCompletion> {
        if !self.user_exists(completion.user_id).await? {
            return Err(StoreError::missing_user(completion.user_id));
        }
        let owner: Option<String> = sqlx::query_scalar("SELECT user_id FROM habits WHERE id = ?")
            .bind(completion.habit_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        if owner.as_deref() != Some(completion.user_id.to_string().as_str()) {
            return Err(StoreError::not_found(
                "Habit",
                completion.habit_id.to_string(),
            ));
        }

        // The UNIQUE (habit_id, date) constraint arbitrates concurrent inserts.
        sqlx::query(
            "INSERT INTO habit_completions (id, habit_id, user_id, date, completed_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(completion.id.to_string())
        .bind(completion.habit_id.to_string())
        .bind(completion.user_id.to_string())
        .bind(completion.date.to_string())
        .bind(completion.completed_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "HabitCompletion",
                format!("{}@{}", completion.habit_id, completion.date),
            )
        })?;
        Ok(completion)
    }

    async fn delete_habit_completion(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "DELETE FROM habit_completions WHERE habit_id = ? AND user_id = ? AND date = ?",
        )
        .bind(habit_id.to_string())
        .bind(user_id.to_string())
        .bind(date.to_string())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
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
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, habit_id, user_id, date, completed_at FROM habit_completions WHERE 1 = 1",
        );
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        if let Some(habit_id) = filter.habit_id {
            query.push(" AND habit_id = ").push_bind(habit_id.to_string());
        }
        if let Some(start) = filter.start_date {
            query.push(" AND date >= ").push_bind(start.to_string());
        }
        if let Some(end) = filter.end_date {
            query.push(" AND date <= ").push_bind(end.to_string());
        }
        query.push(" ORDER BY date, rowid");

        let rows: Vec<CompletionRow> = query.build_query_as().fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    // =========================================================================
    // Daily check-in operations
    // =========================================================================

    async fn create_daily_checkin(&self, checkin: DailyCheckin) -> StoreResult<DailyCheckin> {
        sqlx::query(
            "INSERT INTO daily_checkins (id, user_id, date, mood, energy_level, notes, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(checkin.id.to_string())
        .bind(checkin.user_id.to_string())
        .bind(checkin.date.to_string())
        .bind(&checkin.mood)
        .bind(i64::from(checkin.energy_level))
        .bind(&checkin.notes)
        .bind(checkin.completed_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "DailyCheckin",
                format!("{}@{}", checkin.user_id, checkin.date),
            )
        })?;
        Ok(checkin)
    }

    async fn get_daily_checkin(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<DailyCheckin>> {
        let row: Option<CheckinRow> = sqlx::query_as(&format!(
            "SELECT {CHECKIN_COLUMNS} FROM daily_checkins WHERE user_id = ? AND date = ?"
        ))
        .bind(user_id.to_string())
        .bind(date.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(DailyCheckin::try_from).transpose()
    }

    async fn list_daily_checkins(&self, user_id: Uuid) -> StoreResult<Vec<DailyCheckin>> {
        let rows: Vec<CheckinRow> = sqlx::query_as(&format!(
            "SELECT {CHECKIN_COLUMNS} FROM daily_checkins WHERE user_id = ? ORDER BY date"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    // =========================================================================
    // Self-assessment operations
    // =========================================================================

    async fn create_self_assessment(
        &self,
        assessment: SelfAssessment,
    ) -> StoreResult<SelfAssessment> {
        sqlx::query(
            "INSERT INTO self_assessments (id, user_id, assessment_type, dimensions, responses, completed_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(assessment.id.to_string())
        .bind(assessment.user_id.to_string())
        .bind(assessment.assessment_type.as_str())
        .bind(serde_json::to_string(&assessment.dimensions)?)
        .bind(serde_json::to_string(&assessment.responses)?)
        .bind(assessment.completed_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "SelfAssessment", assessment.id.to_string()))?;
        Ok(assessment)
    }

    async fn list_self_assessments(&self, user_id: Uuid) -> StoreResult<Vec<SelfAssessment>> {
        let rows: Vec<SelfAssessmentRow> = sqlx::query_as(&format!(
            "SELECT {SELF_ASSESSMENT_COLUMNS} FROM self_assessments WHERE user_id = ?
             ORDER BY rowid DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn get_latest_self_assessment(
        &self,
        user_id: Uuid,
        assessment_type: AssessmentType,
    ) -> StoreResult<Option<SelfAssessment>> {
        let row: Option<SelfAssessmentRow> = sqlx::query_as(&format!(
            "SELECT {SELF_ASSESSMENT_COLUMNS} FROM self_assessments
             WHERE user_id = ? AND assessment_type = ?
             ORDER BY rowid DESC LIMIT 1"
        ))
        .bind(user_id.to_string())
        .bind(assessment_type.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(SelfAssessment::try_from).transpose()
    }

    // =========================================================================
    // Progress assessment operations
    // =========================================================================

    async fn create_progress_assessment(
        &self,
        assessment: ProgressAssessment,
    ) -> StoreResult<ProgressAssessment> {
        sqlx::query(
            "INSERT INTO progress_assessments (id, user_id, blueprint_id, week_of, dimensions, overall_rating, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(assessment.id.to_string())
        .bind(assessment.user_id.to_string())
        .bind(assessment.blueprint_id.map(|id| id.to_string()))
        .bind(assessment.week_of.to_string())
        .bind(serde_json::to_string(&assessment.dimensions)?)
        .bind(i64::from(assessment.overall_rating))
        .bind(&assessment.notes)
        .bind(assessment.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "ProgressAssessment",
                format!("{}@{}", assessment.user_id, assessment.week_of),
            )
        })?;
        Ok(assessment)
    }

    async fn list_progress_assessments(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<ProgressAssessment>> {
        let rows: Vec<AssessmentRow> = sqlx::query_as(&format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM progress_assessments WHERE user_id = ?
             ORDER BY rowid DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn get_latest_progress_assessment(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Option<ProgressAssessment>> {
        let row: Option<AssessmentRow> = sqlx::query_as(&format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM progress_assessments WHERE user_id = ?
             ORDER BY rowid DESC LIMIT 1"
        ))
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(ProgressAssessment::try_from).transpose()
    }

    // =========================================================================
    // Recommendation operations
    // =========================================================================

    async fn create_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> StoreResult<Recommendation> {
        sqlx::query(
            "INSERT INTO recommendations (id, user_id, title, description, category, impact, priority, kind, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(recommendation.id.to_string())
        .bind(recommendation.user_id.to_string())
        .bind(&recommendation.title)
        .bind(&recommendation.description)
        .bind(&recommendation.category)
        .bind(&recommendation.impact)
        .bind(i64::from(recommendation.priority))
        .bind(recommendation.kind.as_str())
        .bind(recommendation.is_active)
        .bind(recommendation.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Recommendation", recommendation.id.to_string()))?;
        Ok(recommendation)
    }

    async fn get_recommendation(&self, id: Uuid) -> StoreResult<Option<Recommendation>> {
        let row: Option<RecommendationRow> = sqlx::query_as(&format!(
            "SELECT {RECOMMENDATION_COLUMNS} FROM recommendations WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Recommendation::try_from).transpose()
    }

    async fn list_recommendations(
        &self,
        user_id: Uuid,
        active_only: bool,
    ) -> StoreResult<Vec<Recommendation>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {RECOMMENDATION_COLUMNS} FROM recommendations WHERE user_id = "
        ));
        query.push_bind(user_id.to_string());
        if active_only {
            query.push(" AND is_active = 1");
        }
        query.push(" ORDER BY priority, rowid");

        let rows: Vec<RecommendationRow> = query.build_query_as().fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn update_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> StoreResult<Recommendation> {
        let result = sqlx::query(
            "UPDATE recommendations SET title = ?, description = ?, category = ?, impact = ?,
                 priority = ?, kind = ?, is_active = ?
             WHERE id = ?",
        )
        .bind(&recommendation.title)
        .bind(&recommendation.description)
        .bind(&recommendation.category)
        .bind(&recommendation.impact)
        .bind(i64::from(recommendation.priority))
        .bind(recommendation.kind.as_str())
        .bind(recommendation.is_active)
        .bind(recommendation.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "Recommendation",
                recommendation.id.to_string(),
            ));
        }
        self.get_recommendation(recommendation.id)
            .await?
            .ok_or_else(|| StoreError::not_found("Recommendation", recommendation.id.to_string()))
    }

    async fn deactivate_recommendations(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE recommendations SET is_active = 0 WHERE user_id = ? AND is_active = 1",
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    // Accountability buddy operations
    // =========================================================================

    async fn create_accountability_buddy(
        &self,
        buddy: AccountabilityBuddy,
    ) -> StoreResult<AccountabilityBuddy> {
        sqlx::query(
            "INSERT INTO accountability_buddies (id, user_id, buddy_id, status, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(buddy.id.to_string())
        .bind(buddy.user_id.to_string())
        .bind(buddy.buddy_id.to_string())
        .bind(buddy.status.as_str())
        .bind(buddy.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "AccountabilityBuddy",
                format!("{}->{}", buddy.user_id, buddy.buddy_id),
            )
        })?;
        Ok(buddy)
    }

    async fn list_accountability_buddies(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<AccountabilityBuddy>> {
        let rows: Vec<BuddyRow> = sqlx::query_as(&format!(
            "SELECT {BUDDY_COLUMNS} FROM accountability_buddies
             WHERE user_id = ? AND status = ?
             ORDER BY rowid"
        ))
        .bind(user_id.to_string())
        .bind(BuddyStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    // =========================================================================
    // Community operations
    // =========================================================================

    async fn create_community_update(
        &self,
        update: CommunityUpdate,
    ) -> StoreResult<CommunityUpdate> {
        sqlx::query(
            "INSERT INTO community_updates (id, user_id, content, update_type, likes, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(update.id.to_string())
        .bind(update.user_id.to_string())
        .bind(&update.content)
        .bind(update.update_type.as_str())
        .bind(i64::from(update.likes))
        .bind(update.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "CommunityUpdate", update.id.to_string()))?;
        Ok(update)
    }

    async fn list_community_updates(&self, limit: u32) -> StoreResult<Vec<CommunityUpdate>> {
        let rows: Vec<CommunityUpdateRow> = sqlx::query_as(&format!(
            "SELECT {COMMUNITY_COLUMNS} FROM community_updates
             ORDER BY rowid DESC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn like_community_update(&self, id: Uuid) -> StoreResult<CommunityUpdate> {
        let result = sqlx::query("UPDATE community_updates SET likes = likes + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("CommunityUpdate", id.to_string()));
        }
        let row: CommunityUpdateRow = sqlx::query_as(&format!(
            "SELECT {COMMUNITY_COLUMNS} FROM community_updates WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await?;
        CommunityUpdate::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::conformance;

    async fn store() -> SqliteAlignStore {
        SqliteAlignStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_conformance_users() {
        conformance::user_lifecycle(&store().await).await;
    }

    #[tokio::test]
    async fn test_conformance_blueprints_and_habits() {
        conformance::blueprints_and_habits(&store().await).await;
    }

    #[tokio::test]
    async fn test_conformance_completions() {
        conformance::completion_uniqueness(&store().await).await;
        conformance::completion_queries(&store().await).await;
    }

    #[tokio::test]
    async fn test_conformance_checkins_and_assessments() {
        conformance::checkins_and_assessments(&store().await).await;
    }

    #[tokio::test]
    async fn test_conformance_recommendations_and_community() {
        conformance::recommendations(&store().await).await;
        conformance::community(&store().await).await;
    }

    #[tokio::test]
    async fn test_conformance_self_assessments() {
        conformance::self_assessments(&store().await).await;
    }

    #[tokio::test]
    async fn test_conformance_buddies() {
        conformance::buddies(&store().await).await;
    }

    #[tokio::test]
    async fn test_conformance_cascade() {
        conformance::cascade_delete(&store().await).await;
    }

    #[tokio::test]
    async fn test_in_memory_database_survives_connection_loss() {
        let store = store().await;
        store.create_user(User::new("kept@example.com")).await.unwrap();

        let detached = store.pool.acquire().await.unwrap().detach();
        drop(detached);

        let kept = store.get_user_by_email("kept@example.com").await.unwrap();
        assert!(kept.is_some());
        store.create_user(User::new("after@example.com")).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_writes_on_file_database() {
        let dir = tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("race.db").display());
        let store = Arc::new(SqliteAlignStore::connect(&url).await.unwrap());

        let (successes, conflicts) = conformance::concurrent_duplicates(store).await;
        assert_eq!(successes, 2);
        assert_eq!(conflicts, 14);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connects() {
        let dir = tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("lifealign.db").display());

        let first = SqliteAlignStore::connect(&url).await.unwrap();
        let user = first.create_user(User::new("durable@example.com")).await.unwrap();
        first.pool.close().await;

        let second = SqliteAlignStore::connect(&url).await.unwrap();
        assert_eq!(second.get_user(user.id).await.unwrap().unwrap().email, "durable@example.com");
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = store().await;
        store.init().await.unwrap();
        store.init().await.unwrap();
    }
}
