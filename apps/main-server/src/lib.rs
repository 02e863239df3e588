//! LifeAlign server
//!
//! HTTP surface over the LifeAlign store and rule engine: blueprints, habits
//! and their completions, check-ins, assessments, recommendations and the
//! community feed.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use align_store::{AlignStore, seed_demo_data};
use auth::{JwtConfig, JwtManager};
use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{ensure_local_user, identity_middleware};
use crate::state::{AppState, today};

/// Creates the application router with all routes configured.
pub fn create_app<S: AlignStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router::<S>()
        .route_layer(from_fn_with_state(state.clone(), identity_middleware::<S>))
        .route("/health", get(api::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration and store.
///
/// In single-user mode the local user is created up front. Demo data is
/// seeded when configured.
pub async fn create_state<S: AlignStore>(
    config: Config,
    store: S,
) -> anyhow::Result<Arc<AppState<S>>> {
    let jwt_manager = match (&config.jwt_secret, config.auth_enabled()) {
        (Some(secret), true) => Some(JwtManager::new(
            JwtConfig::new(secret).with_issuer(config.jwt_issuer.clone()),
        )?),
        (None, true) => anyhow::bail!("a JWT secret is required in multi-user mode"),
        (_, false) => None,
    };

    if config.single_user_mode {
        let user = ensure_local_user(&store, &config.local_user_email).await?;
        tracing::info!(user_id = %user.id, email = %user.email, "Single-user mode");
    }

    if config.seed_demo {
        let user = seed_demo_data(&store, today()).await?;
        tracing::info!(user_id = %user.id, "Demo data ready");
    }

    Ok(Arc::new(AppState::new(config, store, jwt_manager)))
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
