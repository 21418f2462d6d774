//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and migrations
//! - Refresh token and user stores
//! - Transaction helpers

pub mod connection;
pub mod mysql;
pub mod transaction;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlRefreshTokenStore, MySqlUserRepository};
