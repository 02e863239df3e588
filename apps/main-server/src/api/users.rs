//! Current user endpoints.

use std::sync::Arc;

use align_store::AlignStore;
use api_protocol::{requests::UpdateUserRequest, responses::*};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::error::ServerResult;
use crate::extract::ValidJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Returns the caller's profile.
pub async fn get_current_user<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<CurrentUserResponse>> {
    Ok(Json(CurrentUserResponse {
        user,
        single_user_mode: !state.auth_enabled(),
    }))
}

/// Updates the caller's profile fields. Absent fields are left unchanged.
pub async fn update_current_user<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(mut user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<UpdateUserRequest>,
) -> ServerResult<Json<CurrentUserResponse>> {
    if let Some(display_name) = request.display_name {
        user.display_name = Some(display_name);
    }
    if let Some(first_name) = request.first_name {
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = request.last_name {
        user.last_name = Some(last_name);
    }
    if let Some(url) = request.profile_image_url {
        user.profile_image_url = Some(url);
    }
    user.updated_at = Utc::now();

    let user = state.store.update_user(user).await?;
    tracing::info!(user_id = %user.id, "User profile updated");

    Ok(Json(CurrentUserResponse {
        user,
        single_user_mode: !state.auth_enabled(),
    }))
}

/// Deletes the caller and everything they own.
pub async fn delete_current_user<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<SuccessResponse>> {
    state.store.delete_user(user.id).await?;
    tracing::info!(user_id = %user.id, "User deleted");
    Ok(Json(SuccessResponse::ok()))
}
