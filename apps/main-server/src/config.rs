//! Server configuration.

use std::env;

use blueprint_engine::{DEFAULT_RECOMMENDATION_LIMIT, TemplateSelection};

/// Email of the account every request acts as in single-user mode.
pub const DEFAULT_LOCAL_USER_EMAIL: &str = "local@lifealign.dev";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Whether running in single-user mode.
    pub single_user_mode: bool,
    /// Identity of the local user in single-user mode.
    pub local_user_email: String,
    /// JWT secret (required in multi-user mode).
    pub jwt_secret: Option<String>,
    /// Expected JWT issuer.
    pub jwt_issuer: String,
    /// Seed the demo account at startup.
    pub seed_demo: bool,
    /// How generators pick among templates.
    pub template_selection: TemplateSelection,
    /// Maximum number of generated recommendations.
    pub recommendation_limit: usize,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: None,
            single_user_mode: true,
            local_user_email: DEFAULT_LOCAL_USER_EMAIL.to_string(),
            jwt_secret: None,
            jwt_issuer: auth::DEFAULT_JWT_ISSUER.to_string(),
            seed_demo: false,
            template_selection: TemplateSelection::default(),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            log_level: "info".to_string(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let single_user_mode = env_flag("LIFEALIGN_SINGLE_USER_MODE", defaults.single_user_mode);

        let jwt_secret = env::var("LIFEALIGN_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        if !single_user_mode && jwt_secret.is_none() {
            anyhow::bail!("LIFEALIGN_JWT_SECRET is required in multi-user mode");
        }

        let template_selection = match env::var("LIFEALIGN_TEMPLATE_SELECTION") {
            Ok(value) => value
                .parse()
                .map_err(|e| anyhow::anyhow!("LIFEALIGN_TEMPLATE_SELECTION: {e}"))?,
            Err(_) => defaults.template_selection,
        };

        let recommendation_limit = match env::var("LIFEALIGN_RECOMMENDATION_LIMIT") {
            Ok(value) => value
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("LIFEALIGN_RECOMMENDATION_LIMIT must be a positive integer")
                })?,
            Err(_) => defaults.recommendation_limit,
        };

        Ok(Self {
            host: env::var("LIFEALIGN_SERVER_HOST").unwrap_or(defaults.host),
            port: env::var("LIFEALIGN_SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            single_user_mode,
            local_user_email: env::var("LIFEALIGN_LOCAL_USER_EMAIL")
                .unwrap_or(defaults.local_user_email),
            jwt_secret,
            jwt_issuer: env::var("LIFEALIGN_JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            seed_demo: env_flag("LIFEALIGN_SEED_DEMO", defaults.seed_demo),
            template_selection,
            recommendation_limit,
            log_level: env::var("LIFEALIGN_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if bearer tokens are required.
    pub fn auth_enabled(&self) -> bool {
        !self.single_user_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "LIFEALIGN_SINGLE_USER_MODE",
        "LIFEALIGN_JWT_SECRET",
        "LIFEALIGN_TEMPLATE_SELECTION",
        "LIFEALIGN_RECOMMENDATION_LIMIT",
        "LIFEALIGN_SERVER_PORT",
        "LIFEALIGN_SEED_DEMO",
        "DATABASE_URL",
    ];

    // Environment mutation is process-wide, so everything runs in one test.
    #[test]
    fn test_from_env() {
        // SAFETY: no other test in this crate reads these variables.
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }

        let config = Config::from_env().unwrap();
        assert!(config.single_user_mode);
        assert!(!config.auth_enabled());
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_url, None);
        assert_eq!(config.template_selection, TemplateSelection::Modulo);
        assert_eq!(config.recommendation_limit, DEFAULT_RECOMMENDATION_LIMIT);

        unsafe {
            env::set_var("LIFEALIGN_TEMPLATE_SELECTION", "seeded:42");
            env::set_var("LIFEALIGN_RECOMMENDATION_LIMIT", "3");
            env::set_var("LIFEALIGN_SEED_DEMO", "1");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.template_selection, TemplateSelection::Seeded(42));
        assert_eq!(config.recommendation_limit, 3);
        assert!(config.seed_demo);

        unsafe {
            env::set_var("LIFEALIGN_RECOMMENDATION_LIMIT", "0");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("LIFEALIGN_RECOMMENDATION_LIMIT");
            env::set_var("LIFEALIGN_SINGLE_USER_MODE", "false");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::set_var("LIFEALIGN_JWT_SECRET", "secret");
        }
        let config = Config::from_env().unwrap();
        assert!(config.auth_enabled());

        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }
}
