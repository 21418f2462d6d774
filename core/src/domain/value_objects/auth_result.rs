//! Token bundle returned by login and refresh.

use serde::{Deserialize, Serialize};

/// Access token, refresh token and access-token lifetime
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    /// Signed HS256 access token
    pub access_token: String,

    /// Opaque refresh token value
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl AuthResult {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

impl std::fmt::Debug for AuthResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResult")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_camel_case() {
        let result = AuthResult::new("a.b.c".to_string(), "r".to_string(), 86400);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["accessToken"], "a.b.c");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["expiresIn"], 86400);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let result = AuthResult::new("secret-access".to_string(), "secret-refresh".to_string(), 60);
        let debug = format!("{:?}", result);
        assert!(!debug.contains("secret"));
    }
}
