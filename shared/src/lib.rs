//! Shared utilities and common types for the HR authentication backend
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types
//! - The error response envelope
//! - Tracing subscriber setup

pub mod config;
pub mod errors;
pub mod telemetry;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use telemetry::init_tracing;
