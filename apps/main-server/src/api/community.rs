//! Community feed endpoints.

use std::sync::Arc;

use align_store::AlignStore;
use api_protocol::requests::*;
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use entities::CommunityUpdate;
use uuid::Uuid;

use crate::error::ServerResult;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Lists the most recent updates from all users.
pub async fn list_updates<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    ValidQuery(query): ValidQuery<CommunityQuery>,
) -> ServerResult<Json<Vec<CommunityUpdate>>> {
    Ok(Json(state.store.list_community_updates(query.limit()).await?))
}

/// Publishes an update as the caller.
pub async fn create_update<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<CreateCommunityUpdateRequest>,
) -> ServerResult<(StatusCode, Json<CommunityUpdate>)> {
    let update = state
        .store
        .create_community_update(CommunityUpdate::new(
            user.id,
            request.content.trim(),
            request.update_type,
        ))
        .await?;
    tracing::info!(user_id = %user.id, update_id = %update.id, "Community update posted");

    Ok((StatusCode::CREATED, Json(update)))
}

/// Likes an update.
pub async fn like_update<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    ValidPath(update_id): ValidPath<Uuid>,
) -> ServerResult<Json<CommunityUpdate>> {
    Ok(Json(state.store.like_community_update(update_id).await?))
}
