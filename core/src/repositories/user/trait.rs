//! User repository trait for the read side of authentication.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::StoreError;

/// Read access to users and their roles
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID, roles included
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;

    /// Find a user whose email or user name equals `login`, ignoring case
    async fn find_by_email_or_user_name(&self, login: &str) -> Result<Option<User>, StoreError>;
}
