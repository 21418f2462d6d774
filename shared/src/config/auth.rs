//! Authentication and token configuration

use serde::{Deserialize, Serialize};

use super::parse_var;

const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing and refresh token lifetime configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HMAC-SHA256 secret for signing access tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim, the issuer is used when unset
    #[serde(default)]
    pub audience: Option<String>,

    /// Tolerated clock difference when checking `nbf` and `exp`, in seconds
    #[serde(default = "default_clock_skew")]
    pub clock_skew_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_SECRET),
            access_token_expiry: 86400,   // 1 day
            refresh_token_expiry_days: 30,
            issuer: String::from("hr-auth"),
            audience: None,
            clock_skew_seconds: default_clock_skew(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set access token expiry in seconds
    pub fn with_access_expiry_seconds(mut self, seconds: i64) -> Self {
        self.access_token_expiry = seconds;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Lifetime given to newly created refresh tokens
    pub fn refresh_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_expiry_days)
    }

    /// Audience written to and required from access tokens
    pub fn effective_audience(&self) -> &str {
        self.audience.as_deref().unwrap_or(&self.issuer)
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Revoke a whole token family when an already consumed refresh token is presented again
    #[serde(default = "default_revoke_family_on_reuse")]
    pub revoke_family_on_reuse: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            revoke_family_on_reuse: default_revoke_family_on_reuse(),
        }
    }
}

impl AuthConfig {
    /// Apply `JWT_*` and `AUTH_*` variables that are set on top of this configuration
    pub fn with_overrides(mut self, var: &dyn Fn(&str) -> Option<String>) -> Self {
        let jwt = &mut self.jwt;
        if let Some(secret) = var("JWT_SECRET") {
            jwt.secret = secret;
        }
        if let Some(issuer) = var("JWT_ISSUER") {
            jwt.issuer = issuer;
        }
        if let Some(audience) = var("JWT_AUDIENCE") {
            jwt.audience = Some(audience);
        }
        jwt.access_token_expiry = parse_var(var, "JWT_ACCESS_TOKEN_EXPIRY", jwt.access_token_expiry);
        jwt.refresh_token_expiry_days =
            parse_var(var, "JWT_REFRESH_TOKEN_EXPIRY_DAYS", jwt.refresh_token_expiry_days);
        jwt.clock_skew_seconds = parse_var(var, "JWT_CLOCK_SKEW_SECONDS", jwt.clock_skew_seconds);
        self.revoke_family_on_reuse =
            parse_var(var, "AUTH_REVOKE_FAMILY_ON_REUSE", self.revoke_family_on_reuse);
        self
    }
}

fn default_clock_skew() -> u64 {
    30
}

fn default_revoke_family_on_reuse() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 86400);
        assert_eq!(config.refresh_token_expiry_days, 30);
        assert_eq!(config.effective_audience(), "hr-auth");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_issuer("hr-platform")
            .with_access_expiry_seconds(600)
            .with_refresh_expiry_days(14);

        assert_eq!(config.secret, "my-secret");
        assert_eq!(config.issuer, "hr-platform");
        assert_eq!(config.access_token_expiry, 600);
        assert_eq!(config.refresh_token_expiry_days, 14);
        assert_eq!(config.refresh_token_lifetime(), chrono::Duration::days(14));
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_explicit_audience_wins_over_issuer() {
        let mut config = JwtConfig::default();
        config.audience = Some("hr-api".to_string());
        assert_eq!(config.effective_audience(), "hr-api");
    }

    #[test]
    fn test_auth_config_deserializes_with_defaults() {
        let json = r#"{
            "jwt": {
                "secret": "s",
                "access_token_expiry": 60,
                "refresh_token_expiry_days": 1,
                "issuer": "hr"
            }
        }"#;
        let config: AuthConfig = serde_json::from_str(json).unwrap();
        assert!(config.revoke_family_on_reuse);
        assert_eq!(config.jwt.clock_skew_seconds, 30);
        assert_eq!(config.jwt.audience, None);
    }
}
