//! Configuration for the token issuer

use hr_shared::config::AuthConfig;

use crate::domain::entities::token::ACCESS_TOKEN_EXPIRY_SECONDS;

/// Issuer, access token lifetime and replay settings
///
/// Refresh token lifetime belongs to the store that creates the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenServiceConfig {
    /// `iss` claim written and required on verification
    pub issuer: String,
    /// `aud` claim written and required on verification
    pub audience: String,
    /// Access token lifetime in seconds
    pub access_token_expiry_seconds: i64,
    /// Leeway applied to `exp` and `nbf` when verifying access tokens
    pub clock_skew_seconds: u64,
    /// Revoke the whole family when a consumed refresh token is presented again
    pub revoke_family_on_reuse: bool,
}

impl TokenServiceConfig {
    /// Build from the shared auth configuration. The signing secret is
    /// handled separately by `SigningKey`.
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            issuer: config.jwt.issuer.clone(),
            audience: config.jwt.effective_audience().to_string(),
            access_token_expiry_seconds: config.jwt.access_token_expiry,
            clock_skew_seconds: config.jwt.clock_skew_seconds,
            revoke_family_on_reuse: config.revoke_family_on_reuse,
        }
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            issuer: "hr-auth".to_string(),
            audience: "hr-auth".to_string(),
            access_token_expiry_seconds: ACCESS_TOKEN_EXPIRY_SECONDS,
            clock_skew_seconds: 30,
            revoke_family_on_reuse: true,
        }
    }
}
