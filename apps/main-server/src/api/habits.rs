//! Habit endpoints.

use std::sync::Arc;

use align_store::AlignStore;
use api_protocol::{requests::*, responses::*};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use entities::{Habit, TrackedHabit};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::CurrentUser;
use crate::services::progress;
use crate::state::{AppState, today};

/// Lists the caller's active habits with their streaks.
pub async fn list_habits<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<TrackedHabit>>> {
    let habits = progress::tracked_habits(&state.store, user.id, today()).await?;
    Ok(Json(habits))
}

/// Creates a habit under the caller's latest blueprint.
pub async fn create_habit<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<CreateHabitRequest>,
) -> ServerResult<(StatusCode, Json<Habit>)> {
    let blueprint = state
        .store
        .get_latest_blueprint(user.id)
        .await?
        .ok_or_else(|| {
            ServerError::InvalidRequest("Create a blueprint before adding habits".to_string())
        })?;

    let mut habit = Habit::new(user.id, request.title.trim(), request.category.trim())
        .with_blueprint(blueprint.id);
    habit.description = request.description;
    habit.focus_area = request.focus_area;
    habit.duration_minutes = request.duration_minutes;

    let habit = state.store.create_habit(habit).await?;
    tracing::info!(user_id = %user.id, habit_id = %habit.id, "Habit created");

    Ok((StatusCode::CREATED, Json(habit)))
}

/// Loads an active habit owned by `user_id`.
pub(crate) async fn owned_habit<S: AlignStore>(
    state: &AppState<S>,
    user_id: Uuid,
    habit_id: Uuid,
) -> ServerResult<Habit> {
    state
        .store
        .get_habit(habit_id)
        .await?
        .filter(|h| h.user_id == user_id && h.is_active)
        .ok_or_else(|| ServerError::not_found("Habit"))
}

/// Updates a habit's fields. Absent fields are left unchanged.
pub async fn update_habit<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidPath(habit_id): ValidPath<Uuid>,
    ValidJson(request): ValidJson<UpdateHabitRequest>,
) -> ServerResult<Json<Habit>> {
    let mut habit = owned_habit(&state, user.id, habit_id).await?;

    if let Some(title) = request.title {
        habit.title = title.trim().to_string();
    }
    if let Some(description) = request.description {
        habit.description = Some(description);
    }
    if let Some(category) = request.category {
        habit.category = category.trim().to_string();
    }
    if let Some(focus_area) = request.focus_area {
        habit.focus_area = Some(focus_area);
    }
    if let Some(minutes) = request.duration_minutes {
        habit.duration_minutes = Some(minutes);
    }

    let habit = state.store.update_habit(habit).await?;
    tracing::info!(habit_id = %habit.id, "Habit updated");

    Ok(Json(habit))
}

/// Deactivates a habit. Its completion history is kept.
pub async fn delete_habit<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidPath(habit_id): ValidPath<Uuid>,
) -> ServerResult<Json<SuccessResponse>> {
    owned_habit(&state, user.id, habit_id).await?;
    state.store.deactivate_habit(habit_id).await?;
    tracing::info!(habit_id = %habit_id, "Habit deactivated");

    Ok(Json(SuccessResponse::ok()))
}
