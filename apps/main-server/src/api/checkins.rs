//! Daily check-in endpoints.

use std::sync::Arc;

use align_store::AlignStore;
use api_protocol::requests::CreateCheckinRequest;
use axum::{Extension, Json, extract::State, http::StatusCode};
use entities::DailyCheckin;

use crate::error::ServerResult;
use crate::extract::ValidJson;
use crate::middleware::CurrentUser;
use crate::state::{AppState, today};

/// Lists the caller's check-ins by date.
pub async fn list_checkins<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<DailyCheckin>>> {
    Ok(Json(state.store.list_daily_checkins(user.id).await?))
}

/// Returns today's check-in, or `null`.
pub async fn get_today_checkin<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Option<DailyCheckin>>> {
    Ok(Json(state.store.get_daily_checkin(user.id, today()).await?))
}

/// Records a check-in. One per user per date.
pub async fn create_checkin<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<CreateCheckinRequest>,
) -> ServerResult<(StatusCode, Json<DailyCheckin>)> {
    let date = request.date.unwrap_or_else(today);
    let mut checkin = DailyCheckin::new(user.id, date, request.mood.trim(), request.energy_level);
    checkin.notes = request.notes;

    let checkin = state.store.create_daily_checkin(checkin).await?;
    tracing::info!(user_id = %user.id, %date, energy = checkin.energy_level, "Check-in recorded");

    Ok((StatusCode::CREATED, Json(checkin)))
}
