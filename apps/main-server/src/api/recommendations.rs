//! Recommendation endpoints.

use std::sync::Arc;

use align_store::AlignStore;
use api_protocol::requests::UpdateRecommendationRequest;
use axum::{
    Extension, Json,
    extract::State,
};
use blueprint_engine::{generate_recommendations, onboarding_recommendations};
use entities::{AssessmentType, Recommendation};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::CurrentUser;
use crate::services::progress;
use crate::state::AppState;

/// Lists the caller's active recommendations by priority.
pub async fn list_recommendations<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<Recommendation>>> {
    Ok(Json(state.store.list_recommendations(user.id, true).await?))
}

/// Replaces the caller's active recommendations with a fresh set.
///
/// Scores come from the latest `current_self` assessment, falling back to
/// the latest weekly assessment. Without either the onboarding
/// recommendation is produced instead.
pub async fn regenerate_recommendations<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<Recommendation>>> {
    let options = state.recommendation_options();

    let dimensions = match state
        .store
        .get_latest_self_assessment(user.id, AssessmentType::CurrentSelf)
        .await?
    {
        Some(assessment) => Some(assessment.dimensions),
        None => state
            .store
            .get_latest_progress_assessment(user.id)
            .await?
            .map(|assessment| assessment.dimensions),
    };

    let drafts = match dimensions {
        Some(dimensions) => {
            let habits = progress::tracked_habits(&state.store, user.id, options.today).await?;
            let checkins = state.store.list_daily_checkins(user.id).await?;
            generate_recommendations(&dimensions, &habits, &checkins, options)?
        }
        None => onboarding_recommendations(),
    };

    let retired = state.store.deactivate_recommendations(user.id).await?;

    let mut recommendations = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let recommendation = state
            .store
            .create_recommendation(draft.into_recommendation(user.id))
            .await?;
        recommendations.push(recommendation);
    }

    tracing::info!(
        user_id = %user.id,
        retired,
        created = recommendations.len(),
        "Recommendations regenerated"
    );

    Ok(Json(recommendations))
}

/// Activates or dismisses a recommendation.
pub async fn update_recommendation<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidPath(recommendation_id): ValidPath<Uuid>,
    ValidJson(request): ValidJson<UpdateRecommendationRequest>,
) -> ServerResult<Json<Recommendation>> {
    let mut recommendation = state
        .store
        .get_recommendation(recommendation_id)
        .await?
        .filter(|r| r.user_id == user.id)
        .ok_or_else(|| ServerError::not_found("Recommendation"))?;

    recommendation.is_active = request.is_active;
    let recommendation = state.store.update_recommendation(recommendation).await?;
    tracing::info!(
        recommendation_id = %recommendation.id,
        is_active = recommendation.is_active,
        "Recommendation updated"
    );

    Ok(Json(recommendation))
}
