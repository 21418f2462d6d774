//! HMAC signing key for access tokens

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::errors::DomainError;

/// Minimum secret length accepted for HS256
pub const MIN_SECRET_BYTES: usize = 32;

/// Symmetric HS256 key pair derived from the shared secret
///
/// Constructed once at startup and handed to the issuer; the secret itself is
/// not retained.
#[derive(Clone)]
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Creates a key from a shared secret of at least 32 bytes
    pub fn from_secret(secret: &[u8]) -> Result<Self, DomainError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(DomainError::Internal {
                message: format!(
                    "JWT secret must be at least {} bytes, got {}",
                    MIN_SECRET_BYTES,
                    secret.len()
                ),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let error = SigningKey::from_secret(b"too-short").unwrap_err();
        assert!(matches!(error, DomainError::Internal { .. }));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let key = SigningKey::from_secret(b"0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(format!("{:?}", key), "SigningKey { .. }");
    }
}
