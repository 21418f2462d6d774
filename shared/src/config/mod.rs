//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing and lifetime configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/hr_auth_dev"),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::new("mysql://prod-db:3306/hr_auth").with_max_connections(50),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Preset for an environment before any variable overrides
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => Self {
                environment: Environment::Staging,
                logging: LoggingConfig::for_environment(Environment::Staging),
                ..Self::development()
            },
        }
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable source: `ENVIRONMENT` picks the preset, then
    /// each variable that is set overrides the matching preset field.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let env = var("ENVIRONMENT")
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();

        let preset = Self::for_environment(env);
        let mut logging = preset.logging;
        if let Some(level) = var("LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            environment: env,
            database: preset.database.with_overrides(&var),
            auth: preset.auth.with_overrides(&var),
            logging,
        }
    }
}

/// Parse a variable if it is set and well formed, else keep `current`
pub(crate) fn parse_var<T: FromStr>(
    var: &dyn Fn(&str) -> Option<String>,
    key: &str,
    current: T,
) -> T {
    var(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(current)
}
