//! Habit completion endpoints.

use std::sync::Arc;

use align_store::{AlignStore, CompletionFilter};
use api_protocol::{requests::*, responses::*};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use entities::HabitCompletion;
use uuid::Uuid;

use crate::api::habits::owned_habit;
use crate::error::ServerResult;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::CurrentUser;
use crate::state::{AppState, today};

/// Lists the caller's completions on a day or in an inclusive range.
pub async fn list_completions<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidQuery(query): ValidQuery<CompletionQuery>,
) -> ServerResult<Json<Vec<HabitCompletion>>> {
    let filter = match query.window(today()) {
        CompletionWindow::Day(date) => CompletionFilter::on_date(user.id, date),
        CompletionWindow::Range(start, end) => CompletionFilter::between(user.id, start, end),
    };
    Ok(Json(state.store.list_habit_completions(filter).await?))
}

/// Marks a habit done. A second completion on the same date is a conflict.
pub async fn complete_habit<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<CompleteHabitRequest>,
) -> ServerResult<(StatusCode, Json<HabitCompletion>)> {
    let habit = owned_habit(&state, user.id, request.habit_id).await?;
    let date = request.date.unwrap_or_else(today);

    let completion = state
        .store
        .create_habit_completion(HabitCompletion::new(habit.id, user.id, date))
        .await?;
    tracing::info!(habit_id = %habit.id, %date, "Habit completed");

    Ok((StatusCode::CREATED, Json(completion)))
}

/// Removes a habit's completion on a date (default today).
pub async fn uncomplete_habit<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidPath(habit_id): ValidPath<Uuid>,
    ValidQuery(query): ValidQuery<DateQuery>,
) -> ServerResult<Json<SuccessResponse>> {
    let date = query.date.unwrap_or_else(today);
    state
        .store
        .delete_habit_completion(habit_id, user.id, date)
        .await?;
    tracing::info!(habit_id = %habit_id, %date, "Habit completion removed");

    Ok(Json(SuccessResponse::ok()))
}
