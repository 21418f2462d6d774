//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, FieldError, StoreError, TokenError};

use hr_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Stable code handed to clients
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Auth(AuthError::UserNotFound) => error_codes::USER_NOT_FOUND,
            DomainError::Auth(AuthError::InvalidCredentials) => error_codes::INVALID_CREDENTIALS,
            DomainError::Token(TokenError::InvalidRefreshToken) => error_codes::INVALID_REFRESH_TOKEN,
            DomainError::Token(TokenError::InvalidAccessToken) => error_codes::INVALID_ACCESS_TOKEN,
            DomainError::Token(TokenError::TokenPersistenceFailed)
            | DomainError::Token(TokenError::TokenGenerationFailed) => {
                error_codes::TOKEN_PERSISTENCE_FAILED
            }
            DomainError::Store(StoreError::NotFound) => error_codes::NOT_FOUND,
            DomainError::Store(StoreError::ConcurrencyConflict) => error_codes::CONCURRENCY_CONFLICT,
            DomainError::Store(StoreError::Unavailable { .. }) => error_codes::SERVICE_UNAVAILABLE,
            DomainError::Store(StoreError::Corrupt { .. }) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether retrying the same call may succeed.
    ///
    /// Only storage outages qualify. A concurrency conflict signals a replayed
    /// refresh token and must not be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Store(StoreError::Unavailable { .. }))
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        let message = match self {
            // Storage details stay in the logs
            DomainError::Store(StoreError::Unavailable { .. }) => {
                "Service temporarily unavailable".to_string()
            }
            DomainError::Store(StoreError::Corrupt { .. }) | DomainError::Internal { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let response = ErrorResponse::new(self.error_code(), message);
        match self {
            DomainError::Validation { errors } => response.add_detail("errors", errors),
            _ => response,
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    FieldError::new(field, message)
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        DomainError::Validation {
            errors: field_errors,
        }
    }
}
