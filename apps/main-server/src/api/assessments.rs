//! Self-assessment, progress assessment and question endpoints.

use std::sync::Arc;

use align_store::{AlignStore, CompletionFilter};
use api_protocol::{
    requests::{CreateProgressAssessmentRequest, CreateSelfAssessmentRequest},
    responses::ProgressSummaryResponse,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use blueprint_engine::{AssessmentQuestion, assessment_questions};
use entities::{AssessmentType, ProgressAssessment, SelfAssessment};

use crate::error::{ServerError, ServerResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::CurrentUser;
use crate::services::progress;
use crate::state::{AppState, today};

fn parse_assessment_type(value: &str) -> ServerResult<AssessmentType> {
    value
        .parse()
        .map_err(|e: entities::UnknownAssessmentType| ServerError::InvalidRequest(e.to_string()))
}

/// Returns the `ideal_self` or `current_self` question set.
pub async fn get_questions(
    ValidPath(set): ValidPath<String>,
) -> ServerResult<Json<Vec<AssessmentQuestion>>> {
    Ok(Json(assessment_questions(parse_assessment_type(&set)?)))
}

/// Lists the caller's self-assessments, newest first.
pub async fn list_self_assessments<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<SelfAssessment>>> {
    Ok(Json(state.store.list_self_assessments(user.id).await?))
}

/// Stores the answers to an onboarding questionnaire.
pub async fn create_self_assessment<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<CreateSelfAssessmentRequest>,
) -> ServerResult<(StatusCode, Json<SelfAssessment>)> {
    let assessment = SelfAssessment::new(user.id, request.assessment_type, request.dimensions)
        .with_responses(request.responses);
    let assessment = state.store.create_self_assessment(assessment).await?;
    tracing::info!(
        user_id = %user.id,
        assessment_type = %assessment.assessment_type,
        "Self-assessment recorded"
    );

    Ok((StatusCode::CREATED, Json(assessment)))
}

/// Returns the caller's latest self-assessment of a type, or `null`.
pub async fn get_latest_self_assessment<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidPath(assessment_type): ValidPath<String>,
) -> ServerResult<Json<Option<SelfAssessment>>> {
    let assessment_type = parse_assessment_type(&assessment_type)?;
    Ok(Json(
        state
            .store
            .get_latest_self_assessment(user.id, assessment_type)
            .await?,
    ))
}

/// Lists the caller's weekly assessments, newest first.
pub async fn list_progress_assessments<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<ProgressAssessment>>> {
    Ok(Json(state.store.list_progress_assessments(user.id).await?))
}

/// Records a weekly assessment, linked to the caller's latest blueprint if
/// there is one.
pub async fn create_progress_assessment<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidJson(request): ValidJson<CreateProgressAssessmentRequest>,
) -> ServerResult<(StatusCode, Json<ProgressAssessment>)> {
    let mut assessment = ProgressAssessment::new(
        user.id,
        request.week_of,
        request.dimensions,
        request.overall_rating,
    );
    assessment.notes = request.notes;
    if let Some(blueprint) = state.store.get_latest_blueprint(user.id).await? {
        assessment = assessment.with_blueprint(blueprint.id);
    }

    let assessment = state.store.create_progress_assessment(assessment).await?;
    tracing::info!(user_id = %user.id, week_of = %assessment.week_of, "Progress assessment recorded");

    Ok((StatusCode::CREATED, Json(assessment)))
}

/// Returns the caller's dashboard summary.
pub async fn get_progress_summary<S: AlignStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ServerResult<Json<ProgressSummaryResponse>> {
    let today = today();
    let habits = progress::tracked_habits(&state.store, user.id, today).await?;
    let completed_today = state
        .store
        .list_habit_completions(CompletionFilter::on_date(user.id, today))
        .await?
        .iter()
        .filter(|c| habits.iter().any(|h| h.habit.id == c.habit_id))
        .count();
    let best_current_streak = habits.iter().map(|h| h.current_streak).max().unwrap_or(0);
    let latest_assessment = state.store.get_latest_progress_assessment(user.id).await?;

    Ok(Json(ProgressSummaryResponse {
        habits,
        completed_today,
        best_current_streak,
        latest_assessment,
    }))
}
