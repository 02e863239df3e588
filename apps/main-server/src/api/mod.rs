//! API endpoints.

pub mod assessments;
pub mod blueprints;
pub mod buddies;
pub mod checkins;
pub mod community;
pub mod completions;
pub mod habits;
pub mod recommendations;
pub mod users;

use std::sync::Arc;

use align_store::AlignStore;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Creates the router for every `/api` endpoint.
///
/// Handlers expect a `CurrentUser` extension, so the router must be wrapped
/// in the identity middleware.
pub fn create_router<S: AlignStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Current user
        .route(
            "/api/auth/user",
            get(users::get_current_user::<S>)
                .patch(users::update_current_user::<S>)
                .delete(users::delete_current_user::<S>),
        )
        // Blueprints
        .route("/api/blueprints", get(blueprints::list_blueprints::<S>))
        .route("/api/blueprints/me", get(blueprints::get_my_blueprint::<S>))
        .route("/api/blueprints/generate", post(blueprints::generate_blueprint::<S>))
        .route("/api/blueprints/:id/refine", post(blueprints::refine_blueprint::<S>))
        // Assessments
        .route("/api/assessments/questions/:set", get(assessments::get_questions))
        .route(
            "/api/assessments",
            get(assessments::list_self_assessments::<S>)
                .post(assessments::create_self_assessment::<S>),
        )
        .route(
            "/api/assessments/latest/:type",
            get(assessments::get_latest_self_assessment::<S>),
        )
        .route(
            "/api/progress-assessments",
            get(assessments::list_progress_assessments::<S>)
                .post(assessments::create_progress_assessment::<S>),
        )
        .route("/api/progress/summary", get(assessments::get_progress_summary::<S>))
        // Habits
        .route(
            "/api/habits",
            get(habits::list_habits::<S>).post(habits::create_habit::<S>),
        )
        .route(
            "/api/habits/:id",
            patch(habits::update_habit::<S>).delete(habits::delete_habit::<S>),
        )
        // Habit completions
        .route(
            "/api/habit-completions",
            get(completions::list_completions::<S>).post(completions::complete_habit::<S>),
        )
        .route(
            "/api/habit-completions/:habit_id",
            delete(completions::uncomplete_habit::<S>),
        )
        // Daily check-ins
        .route(
            "/api/checkins",
            get(checkins::list_checkins::<S>).post(checkins::create_checkin::<S>),
        )
        .route("/api/checkins/today", get(checkins::get_today_checkin::<S>))
        // Recommendations
        .route("/api/recommendations", get(recommendations::list_recommendations::<S>))
        .route(
            "/api/recommendations/generate",
            post(recommendations::regenerate_recommendations::<S>),
        )
        .route(
            "/api/recommendations/:id",
            patch(recommendations::update_recommendation::<S>),
        )
        // Accountability buddies
        .route(
            "/api/buddies",
            get(buddies::list_buddies::<S>).post(buddies::create_buddy::<S>),
        )
        // Community
        .route(
            "/api/community/updates",
            get(community::list_updates::<S>).post(community::create_update::<S>),
        )
        .route("/api/community/updates/:id/like", post(community::like_update::<S>))
}

/// Health check endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
