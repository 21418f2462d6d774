//! In-memory refresh token store for tests and single-process deployments.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use hr_shared::config::AuthConfig;

use crate::domain::entities::token::{RefreshToken, REFRESH_TOKEN_EXPIRY_DAYS};
use crate::errors::StoreError;

use super::r#trait::RefreshTokenStore;

type TokenKey = (Uuid, String);

/// Refresh token store backed by a map keyed by `(user_id, token)`
///
/// Rotation checks and writes under a single write lock, so concurrent
/// rotations of the same token serialize and only the first succeeds.
#[derive(Clone)]
pub struct InMemoryRefreshTokenStore {
    tokens: Arc<RwLock<HashMap<TokenKey, RefreshToken>>>,
    lifetime: Duration,
}

impl InMemoryRefreshTokenStore {
    /// Create an empty store issuing tokens with the default 30-day lifetime
    pub fn new() -> Self {
        Self::with_lifetime(Duration::days(REFRESH_TOKEN_EXPIRY_DAYS))
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            lifetime,
        }
    }

    /// Create an empty store using the configured refresh token lifetime
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self::with_lifetime(config.jwt.refresh_token_lifetime())
    }

    /// Number of stored records, revoked ones included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    /// Replace a stored record as-is, e.g. to backdate its expiry in tests
    pub async fn put(&self, token: RefreshToken) {
        let key = (token.user_id, token.token.clone());
        self.tokens.write().await.insert(key, token);
    }
}

impl Default for InMemoryRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn find_active(&self, user_id: Uuid) -> Result<Option<RefreshToken>, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id && !t.is_revoked && !t.is_used())
            .max_by_key(|t| t.created_at_utc)
            .cloned())
    }

    async fn find_by_value(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshToken>, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(&(user_id, token.to_string())).cloned())
    }

    async fn find_by_family(&self, family_id: Uuid) -> Result<Vec<RefreshToken>, StoreError> {
        let tokens = self.tokens.read().await;
        let mut family: Vec<RefreshToken> = tokens
            .values()
            .filter(|t| t.token_family_id == family_id)
            .cloned()
            .collect();
        family.sort_by_key(|t| t.created_at_utc);
        Ok(family)
    }

    async fn insert(
        &self,
        user_id: Uuid,
        token: String,
        family_id: Option<Uuid>,
    ) -> Result<RefreshToken, StoreError> {
        let record = match family_id {
            Some(family_id) => RefreshToken::new_in_family(user_id, token, family_id, self.lifetime),
            None => RefreshToken::new(user_id, token, self.lifetime),
        };

        let mut tokens = self.tokens.write().await;
        let key = (user_id, record.token.clone());
        if tokens.contains_key(&key) {
            return Err(StoreError::ConcurrencyConflict);
        }
        tokens.insert(key, record.clone());

        Ok(record)
    }

    async fn rotate(
        &self,
        old: &RefreshToken,
        new_token: String,
    ) -> Result<RefreshToken, StoreError> {
        let mut tokens = self.tokens.write().await;

        let old_key = (old.user_id, old.token.clone());
        match tokens.get(&old_key) {
            None => return Err(StoreError::NotFound),
            Some(current) if current.is_revoked || current.is_used() => {
                return Err(StoreError::ConcurrencyConflict)
            }
            Some(_) => {}
        }

        let successor =
            RefreshToken::new_in_family(old.user_id, new_token, old.token_family_id, self.lifetime);
        let new_key = (successor.user_id, successor.token.clone());
        if tokens.contains_key(&new_key) {
            return Err(StoreError::ConcurrencyConflict);
        }

        // Both checks passed, so neither write below can fail
        if let Some(current) = tokens.get_mut(&old_key) {
            current.consume_at(Utc::now());
        }
        tokens.insert(new_key, successor.clone());

        Ok(successor)
    }

    async fn revoke_family(&self, family_id: Uuid) -> Result<usize, StoreError> {
        let mut tokens = self.tokens.write().await;
        let now = Utc::now();

        let mut revoked = 0;
        for token in tokens
            .values_mut()
            .filter(|t| t.token_family_id == family_id && !t.is_revoked)
        {
            token.revoke_at(now);
            revoked += 1;
        }

        Ok(revoked)
    }
}
