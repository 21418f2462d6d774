//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use hr_core::domain::entities::user::User;
use hr_core::errors::StoreError;
use hr_core::repositories::UserRepository;

use super::{map_sqlx_error, parse_uuid};

/// Reads users from `users` and their roles from `user_roles`
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, StoreError> {
        let id: String = row.try_get("id").map_err(map_sqlx_error)?;

        Ok(User {
            id: parse_uuid(&id, "id")?,
            user_name: row.try_get("user_name").map_err(map_sqlx_error)?,
            email: row.try_get("email").map_err(map_sqlx_error)?,
            display_name: row.try_get("display_name").map_err(map_sqlx_error)?,
            password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
            roles: Vec::new(),
        })
    }

    async fn load_roles(&self, user: &mut User) -> Result<(), StoreError> {
        user.roles = sqlx::query_scalar::<_, String>(
            "SELECT role FROM user_roles WHERE user_id = ? ORDER BY role",
        )
        .bind(user.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_one(&self, row: Option<MySqlRow>) -> Result<Option<User>, StoreError> {
        match row {
            Some(row) => {
                let mut user = Self::row_to_user(&row)?;
                self.load_roles(&mut user).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, user_name, email, display_name, password_hash FROM users WHERE id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.find_one(row).await
    }

    async fn find_by_email_or_user_name(&self, login: &str) -> Result<Option<User>, StoreError> {
        let login = login.trim().to_lowercase();

        let row = sqlx::query(
            r#"
            SELECT id, user_name, email, display_name, password_hash
            FROM users
            WHERE LOWER(email) = ? OR LOWER(user_name) = ?
            ORDER BY LOWER(email) = ? DESC, created_at ASC
            LIMIT 1
            "#,
        )
        .bind(&login)
        .bind(&login)
        .bind(&login)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.find_one(row).await
    }
}
