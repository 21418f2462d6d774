//! Token issuer module
//!
//! Mints HS256 access tokens and drives the refresh-token lifecycle:
//! issuance on login, rotation on refresh, family revocation on logout.

mod config;
mod key;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use key::{SigningKey, MIN_SECRET_BYTES};
pub use service::TokenIssuer;
