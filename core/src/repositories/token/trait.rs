//! Refresh token store trait defining persistence of rotating token chains.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::StoreError;

/// Persistence contract for refresh tokens
///
/// Records are keyed by `(user_id, token)` and grouped by `token_family_id`.
/// Implementations never delete records; revocation and consumption are the
/// only mutations, and both are permanent.
///
/// # Example
/// ```no_run
/// # use hr_core::repositories::RefreshTokenStore;
/// # use hr_core::domain::entities::token::RefreshToken;
/// # async fn example(store: &impl RefreshTokenStore) -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = uuid::Uuid::new_v4();
/// let first = store.insert(user_id, RefreshToken::generate_value(), None).await?;
/// let second = store.rotate(&first, RefreshToken::generate_value()).await?;
/// assert_eq!(first.token_family_id, second.token_family_id);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Most recently created token for the user that is neither revoked nor
    /// consumed. The result may be expired.
    async fn find_active(&self, user_id: Uuid) -> Result<Option<RefreshToken>, StoreError>;

    /// Token with the given value belonging to the user, in any state
    async fn find_by_value(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshToken>, StoreError>;

    /// Every token of a family, oldest first
    async fn find_by_family(&self, family_id: Uuid) -> Result<Vec<RefreshToken>, StoreError>;

    /// Persists a new token. A new family is started when `family_id` is `None`.
    ///
    /// Fails with `ConcurrencyConflict` when the user already holds the value.
    async fn insert(
        &self,
        user_id: Uuid,
        token: String,
        family_id: Option<Uuid>,
    ) -> Result<RefreshToken, StoreError>;

    /// Consumes `old` and inserts its successor in the same family as one unit.
    ///
    /// The old record is revoked and marked used only if it is still neither
    /// revoked nor used; otherwise nothing is written and the call fails with
    /// `ConcurrencyConflict`. If the successor cannot be inserted, the old
    /// record is left untouched.
    async fn rotate(&self, old: &RefreshToken, new_token: String)
        -> Result<RefreshToken, StoreError>;

    /// Revokes every non-revoked token in the family and returns how many
    /// changed. Calling it again returns 0.
    async fn revoke_family(&self, family_id: Uuid) -> Result<usize, StoreError>;

    /// Whether the stored record is currently valid
    async fn is_valid(&self, token: &RefreshToken) -> Result<bool, StoreError> {
        Ok(self
            .find_by_value(token.user_id, &token.token)
            .await?
            .map(|stored| stored.is_valid())
            .unwrap_or(false))
    }
}
