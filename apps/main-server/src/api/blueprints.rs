//! Blueprint endpoints.

use std::sync::Arc;

use align_store::{AlignStore, HabitFilter};
use api_protocol::{requests::*, responses::*};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use blueprint_engine::{BlueprintDraft, BlueprintRefinement, generate_habits};
use chrono::Utc;
use entities::{Blueprint, Habit};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Returns the caller's latest blueprint, or `null`.
pub async fn get_my_blueprint<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Option<Blueprint>>> {
    Ok(Json(state.store.get_latest_blueprint(user.id).await?))
}

/// Lists the caller's blueprints, newest first.
pub async fn list_blueprints<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<Blueprint>>> {
    Ok(Json(state.store.list_blueprints(user.id).await?))
}

/// Stores habits generated for a blueprint.
async fn create_generated_habits<S: AlignStore>(
    state: &AppState<S>,
    blueprint: &Blueprint,
) -> ServerResult<Vec<Habit>> {
    let drafts = generate_habits(&BlueprintDraft::from(blueprint), state.selection());

    let mut habits = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let habit = draft.into_habit(blueprint.user_id, blueprint.id);
        habits.push(state.store.create_habit(habit).await?);
    }
    Ok(habits)
}

/// Generates a blueprint and its starter habits from onboarding answers.
pub async fn generate_blueprint<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<GenerateBlueprintRequest>,
) -> ServerResult<(StatusCode, Json<BlueprintWithHabitsResponse>)> {
    let draft = blueprint_engine::generate_blueprint(&request.responses, state.selection())?;
    let blueprint = state.store.create_blueprint(draft.into_blueprint(user.id)).await?;
    let habits = create_generated_habits(&state, &blueprint).await?;

    tracing::info!(
        user_id = %user.id,
        blueprint_id = %blueprint.id,
        habits = habits.len(),
        "Blueprint generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(BlueprintWithHabitsResponse { blueprint, habits }),
    ))
}

/// Refines a blueprint, optionally replacing its habits.
pub async fn refine_blueprint<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidPath(blueprint_id): ValidPath<Uuid>,
    ValidJson(request): ValidJson<RefineBlueprintRequest>,
) -> ServerResult<Json<BlueprintWithHabitsResponse>> {
    let blueprint = state
        .store
        .get_blueprint(blueprint_id)
        .await?
        .filter(|b| b.user_id == user.id)
        .ok_or_else(|| ServerError::not_found("Blueprint"))?;

    let refinement = BlueprintRefinement {
        feedback: request.feedback,
        new_goals: request.new_goals,
    };
    let refined = blueprint_engine::refine_blueprint(
        BlueprintDraft::from(&blueprint),
        &refinement,
        state.selection(),
    );

    let mut blueprint = refined.apply_to(blueprint);
    blueprint.updated_at = Utc::now();
    let blueprint = state.store.update_blueprint(blueprint).await?;

    let habits = if request.regenerate_habits {
        let existing = state
            .store
            .list_habits(HabitFilter::active_for_blueprint(blueprint.id))
            .await?;
        for habit in &existing {
            state.store.deactivate_habit(habit.id).await?;
        }
        let habits = create_generated_habits(&state, &blueprint).await?;
        tracing::info!(
            blueprint_id = %blueprint.id,
            replaced = existing.len(),
            created = habits.len(),
            "Blueprint habits regenerated"
        );
        habits
    } else {
        state
            .store
            .list_habits(HabitFilter::active_for_blueprint(blueprint.id))
            .await?
    };

    tracing::info!(user_id = %user.id, blueprint_id = %blueprint.id, "Blueprint refined");

    Ok(Json(BlueprintWithHabitsResponse { blueprint, habits }))
}
