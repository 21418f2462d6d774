//! Error kinds for authentication, token management and refresh-token storage
//!
//! Messages on outward-facing variants are deliberately generic: a client must
//! not be able to tell an unknown refresh token from a revoked or expired one.

use serde::Serialize;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Token issuance and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Refresh token is unknown, revoked, expired or already consumed
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Access token signature, algorithm or claims did not verify
    #[error("Invalid access token")]
    InvalidAccessToken,

    /// Creating or rotating the refresh token could not be committed
    #[error("Token persistence failed")]
    TokenPersistenceFailed,

    /// Signing the access token failed
    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Refresh-token store failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Refresh token record not found")]
    NotFound,

    /// Lost a rotation race, or the value already exists for the user
    #[error("Concurrent modification of refresh token")]
    ConcurrencyConflict,

    /// Storage is unreachable; the caller may retry
    #[error("Token storage unavailable: {message}")]
    Unavailable { message: String },

    /// A stored record could not be mapped back to an entity
    #[error("Corrupt token record: {message}")]
    Corrupt { message: String },
}

impl StoreError {
    /// Shorthand for an `Unavailable` error
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }
}

/// A single failed input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_message_is_generic() {
        assert_eq!(TokenError::InvalidRefreshToken.to_string(), "Invalid refresh token");
    }

    #[test]
    fn test_unavailable_carries_message() {
        let error = StoreError::unavailable("pool timed out");
        assert_eq!(error.to_string(), "Token storage unavailable: pool timed out");
    }
}
