//! Application state.

use align_store::AlignStore;
use auth::JwtManager;
use blueprint_engine::{RecommendationOptions, TemplateSelection};
use chrono::{NaiveDate, Utc};

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: AlignStore> {
    /// Server configuration.
    pub config: Config,
    /// Backing store.
    pub store: S,
    /// JWT manager (only used in multi-user mode).
    pub jwt_manager: Option<JwtManager>,
}

impl<S: AlignStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S, jwt_manager: Option<JwtManager>) -> Self {
        Self {
            config,
            store,
            jwt_manager,
        }
    }

    /// Returns true if authentication is enabled.
    pub fn auth_enabled(&self) -> bool {
        self.config.auth_enabled()
    }

    /// Template selection strategy for the generators.
    pub fn selection(&self) -> TemplateSelection {
        self.config.template_selection
    }

    /// Recommendation options as of today.
    pub fn recommendation_options(&self) -> RecommendationOptions {
        RecommendationOptions::new(today()).with_limit(self.config.recommendation_limit)
    }
}

/// The server's notion of the current calendar date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
