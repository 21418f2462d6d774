//! Password verification seam

use async_trait::async_trait;

use crate::errors::{DomainError, DomainResult};

/// Checks a plaintext password against a stored hash
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// `Ok(false)` for a wrong password; `Err` only when the check itself
    /// could not run
    async fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool>;
}

/// bcrypt verifier; hashing runs on the blocking thread pool
#[derive(Debug, Clone)]
pub struct BcryptPasswordVerifier {
    cost: u32,
}

impl BcryptPasswordVerifier {
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Cost only affects `hash`; verification reads the cost from the hash
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password, e.g. when seeding users
    pub fn hash(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
    }
}

impl Default for BcryptPasswordVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordVerifier for BcryptPasswordVerifier {
    async fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                // Malformed stored hash; treat as a mismatch
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bcrypt_round_trip() {
        let verifier = BcryptPasswordVerifier::with_cost(4);
        let hash = verifier.hash("Passw0rd!").unwrap();

        assert!(verifier.verify("Passw0rd!", &hash).await.unwrap());
        assert!(!verifier.verify("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_a_mismatch() {
        let verifier = BcryptPasswordVerifier::with_cost(4);

        assert!(!verifier.verify("Passw0rd!", "not-a-bcrypt-hash").await.unwrap());
    }
}
