//! # Infrastructure Layer
//!
//! Concrete persistence and bootstrap for the HR authentication backend.
//!
//! ## Architecture
//!
//! - **Database**: MySQL pool, migrations, and the refresh token and user
//!   stores implemented with SQLx
//! - **Bootstrap**: [`initialize`] wires configuration, tracing, the pool,
//!   the stores and the core services together
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::sync::Arc;

use hr_core::errors::DomainError;
use hr_core::services::{AuthService, BcryptPasswordVerifier, TokenIssuer};
use hr_shared::config::AppConfig;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

#[cfg(feature = "mysql")]
use database::{DatabasePool, MySqlRefreshTokenStore, MySqlUserRepository};

/// Token issuer over the MySQL stores
#[cfg(feature = "mysql")]
pub type MySqlTokenIssuer = TokenIssuer<MySqlRefreshTokenStore, MySqlUserRepository>;

/// Authentication facade over the MySQL stores
#[cfg(feature = "mysql")]
pub type MySqlAuthService =
    AuthService<MySqlRefreshTokenStore, MySqlUserRepository, BcryptPasswordVerifier>;

/// Infrastructure service container
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct InfrastructureServices {
    pub pool: DatabasePool,
    pub token_store: Arc<MySqlRefreshTokenStore>,
    pub user_repository: Arc<MySqlUserRepository>,
    pub token_issuer: Arc<MySqlTokenIssuer>,
    pub auth_service: Arc<MySqlAuthService>,
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The tracing subscriber from the logging configuration
/// - The database connection pool and schema migrations
/// - Refresh token and user stores
/// - The token issuer and authentication service
#[cfg(feature = "mysql")]
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    hr_shared::telemetry::init_tracing(&config.logging);

    tracing::info!(environment = %config.environment, "Initializing infrastructure services");

    if config.auth.jwt.is_using_default_secret() {
        if config.environment.is_production() {
            return Err(InfrastructureError::Config(
                "JWT_SECRET must be set in production".to_string(),
            ));
        }
        tracing::warn!("Using the development JWT secret; set JWT_SECRET");
    }

    let pool = DatabasePool::new(&config.database).await?;
    pool.run_migrations().await?;

    let token_store = Arc::new(MySqlRefreshTokenStore::with_lifetime(
        pool.get_pool().clone(),
        config.auth.jwt.refresh_token_lifetime(),
    ));
    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));

    let token_issuer = Arc::new(TokenIssuer::from_auth_config(
        Arc::clone(&token_store),
        Arc::clone(&user_repository),
        &config.auth,
    )?);
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&token_issuer),
        Arc::new(BcryptPasswordVerifier::new()),
    ));

    tracing::info!(pool = %pool.get_statistics(), "Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        pool,
        token_store,
        user_repository,
        token_issuer,
        auth_service,
    })
}

/// Load configuration from the environment and initialize
#[cfg(feature = "mysql")]
pub async fn initialize_from_env() -> Result<InfrastructureServices, InfrastructureError> {
    initialize(&AppConfig::from_env()).await
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Core service construction failed, e.g. a short signing secret
    #[error(transparent)]
    Domain(#[from] DomainError),
}
