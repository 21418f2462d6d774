//! Shared setup for token issuer tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::domain::entities::user::User;
use crate::errors::StoreError;
use crate::repositories::{InMemoryRefreshTokenStore, InMemoryUserRepository, RefreshTokenStore};
use crate::services::token::{SigningKey, TokenIssuer, TokenServiceConfig};

pub const SECRET: &[u8] = b"test-secret-key-that-is-at-least-32-bytes";

pub fn sample_user() -> User {
    User::new("jdoe", "jdoe@example.com", "Jane Doe", "hash").with_roles(["Employee"])
}

pub fn issuer_with(
    store: Arc<InMemoryRefreshTokenStore>,
    users: Arc<InMemoryUserRepository>,
    config: TokenServiceConfig,
) -> TokenIssuer<InMemoryRefreshTokenStore, InMemoryUserRepository> {
    let key = SigningKey::from_secret(SECRET).unwrap();
    TokenIssuer::new(store, users, key, config)
}

pub struct Fixture {
    pub store: Arc<InMemoryRefreshTokenStore>,
    pub users: Arc<InMemoryUserRepository>,
    pub issuer: TokenIssuer<InMemoryRefreshTokenStore, InMemoryUserRepository>,
    pub user: User,
}

pub fn fixture() -> Fixture {
    fixture_with(TokenServiceConfig::default())
}

pub fn fixture_with(config: TokenServiceConfig) -> Fixture {
    let user = sample_user();
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let users = Arc::new(InMemoryUserRepository::with_users([user.clone()]));
    let issuer = issuer_with(Arc::clone(&store), Arc::clone(&users), config);

    Fixture {
        store,
        users,
        issuer,
        user,
    }
}

/// Store wrapper whose writes can be made to fail
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryRefreshTokenStore,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::unavailable("connection reset"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RefreshTokenStore for FlakyStore {
    async fn find_active(&self, user_id: Uuid) -> Result<Option<RefreshToken>, StoreError> {
        self.inner.find_active(user_id).await
    }

    async fn find_by_value(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshToken>, StoreError> {
        self.inner.find_by_value(user_id, token).await
    }

    async fn find_by_family(&self, family_id: Uuid) -> Result<Vec<RefreshToken>, StoreError> {
        self.inner.find_by_family(family_id).await
    }

    async fn insert(
        &self,
        user_id: Uuid,
        token: String,
        family_id: Option<Uuid>,
    ) -> Result<RefreshToken, StoreError> {
        self.check()?;
        self.inner.insert(user_id, token, family_id).await
    }

    async fn rotate(
        &self,
        old: &RefreshToken,
        new_token: String,
    ) -> Result<RefreshToken, StoreError> {
        self.check()?;
        self.inner.rotate(old, new_token).await
    }

    async fn revoke_family(&self, family_id: Uuid) -> Result<usize, StoreError> {
        self.check()?;
        self.inner.revoke_family(family_id).await
    }
}

/// Flip a character in the middle of the signature segment
pub fn tamper_signature(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = signature.chars().collect();
    let mid = chars.len() / 2;
    chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", head, chars.into_iter().collect::<String>())
}
