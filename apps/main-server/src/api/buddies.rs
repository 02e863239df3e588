//! Accountability buddy endpoints.

use std::sync::Arc;

use align_store::AlignStore;
use api_protocol::requests::CreateBuddyRequest;
use axum::{Extension, Json, extract::State, http::StatusCode};
use entities::AccountabilityBuddy;

use crate::error::{ServerError, ServerResult};
use crate::extract::ValidJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Lists the caller's active buddy links, oldest first.
pub async fn list_buddies<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<AccountabilityBuddy>>> {
    Ok(Json(state.store.list_accountability_buddies(user.id).await?))
}

/// Links the caller to another user.
///
/// An unknown buddy surfaces as a 400 and a repeated pair as a 409.
pub async fn create_buddy<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<CreateBuddyRequest>,
) -> ServerResult<(StatusCode, Json<AccountabilityBuddy>)> {
    if request.buddy_id == user.id {
        return Err(ServerError::InvalidRequest(
            "cannot add yourself as a buddy".to_string(),
        ));
    }

    let buddy = state
        .store
        .create_accountability_buddy(
            AccountabilityBuddy::new(user.id, request.buddy_id).with_status(request.status),
        )
        .await?;
    tracing::info!(user_id = %user.id, buddy_id = %buddy.buddy_id, "Accountability buddy added");

    Ok((StatusCode::CREATED, Json(buddy)))
}
