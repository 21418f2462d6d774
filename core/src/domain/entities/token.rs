//! Token entities for JWT-based authentication with rotating refresh tokens.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Access token lifetime (1 day)
pub const ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 86400;

/// Refresh token lifetime (30 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

/// Entropy of a refresh token value in bytes
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Claims carried by a signed access token
///
/// Claim names follow the short JWT names used by the HR services' identity
/// stack, so `sub` and `nameid` both hold the user id and a role appears once
/// per assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Name identifier (user ID)
    pub nameid: String,

    /// Display name
    pub name: String,

    /// Display name under its OIDC claim name
    pub given_name: String,

    /// Username
    pub unique_name: String,

    pub email: String,

    /// JWT ID (unique per issuance)
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Assigned roles
    #[serde(default, with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,
}

impl AccessClaims {
    /// Creates claims for an access token issued to `user` at `now`
    pub fn for_user(
        user: &User,
        issuer: &str,
        audience: &str,
        lifetime_seconds: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let expiry = now + Duration::seconds(lifetime_seconds);
        let user_id = user.id.to_string();

        Self {
            sub: user_id.clone(),
            nameid: user_id,
            name: user.display_name.clone(),
            given_name: user.display_name.clone(),
            unique_name: user.user_name.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            role: user.roles.clone(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Serializes a single role as a string and several as an array
mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub fn serialize<S: Serializer>(roles: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        match roles {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(role) => vec![role],
            OneOrMany::Many(roles) => roles,
        })
    }
}

/// One link in a session's rotating refresh-token chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// Shared by every token descended from the same login
    pub token_family_id: Uuid,

    /// Opaque bearer value exchanged by the client
    pub token: String,

    pub created_at_utc: DateTime<Utc>,

    pub expire_at_utc: DateTime<Utc>,

    pub is_revoked: bool,

    pub revoked_at_utc: Option<DateTime<Utc>>,

    /// Set when the token was consumed by a rotation
    pub used_at_utc: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates the first token of a new family
    pub fn new(user_id: Uuid, token: String, lifetime: Duration) -> Self {
        Self::new_in_family(user_id, token, Uuid::new_v4(), lifetime)
    }

    /// Creates a token that continues an existing family
    pub fn new_in_family(
        user_id: Uuid,
        token: String,
        token_family_id: Uuid,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            token_family_id,
            token,
            created_at_utc: now,
            expire_at_utc: now + lifetime,
            is_revoked: false,
            revoked_at_utc: None,
            used_at_utc: None,
        }
    }

    /// Generates a fresh token value: base64 of 32 bytes from the OS CSPRNG
    pub fn generate_value() -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expire_at_utc
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether a rotation already consumed this token
    pub fn is_used(&self) -> bool {
        self.used_at_utc.is_some()
    }

    /// A token is valid when it is not revoked, not consumed and not expired at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && !self.is_used() && !self.is_expired_at(now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Revokes the token. Revocation is permanent; repeated calls keep the first timestamp.
    pub fn revoke_at(&mut self, at: DateTime<Utc>) {
        if !self.is_revoked {
            self.is_revoked = true;
            self.revoked_at_utc = Some(at);
        }
    }

    pub fn revoke(&mut self) {
        self.revoke_at(Utc::now());
    }

    /// Marks the token consumed by a rotation and revokes it
    pub fn consume_at(&mut self, at: DateTime<Utc>) {
        if self.used_at_utc.is_none() {
            self.used_at_utc = Some(at);
        }
        self.revoke_at(at);
    }

    /// Time remaining until expiration, zero once expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expire_at_utc > now {
            self.expire_at_utc - now
        } else {
            Duration::zero()
        }
    }
}
