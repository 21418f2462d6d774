//! MySQL implementation of the RefreshTokenStore trait.
//!
//! Rotation runs in one transaction: a conditional UPDATE consumes the old
//! row only while it is still unrevoked and unused, then the successor is
//! inserted. Losing the race leaves zero affected rows and nothing written.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use hr_core::domain::entities::token::{RefreshToken, REFRESH_TOKEN_EXPIRY_DAYS};
use hr_core::errors::StoreError;
use hr_core::repositories::RefreshTokenStore;

use super::{map_sqlx_error, parse_uuid};
use crate::database::transaction::{begin_transaction, commit_transaction, rollback_transaction};

const SELECT_COLUMNS: &str = "id, user_id, token_family_id, token, is_revoked, \
     revoked_at_utc, used_at_utc, expire_at_utc, created_at_utc";

/// Refresh token store backed by the `refresh_tokens` table
#[derive(Clone)]
pub struct MySqlRefreshTokenStore {
    pool: MySqlPool,
    lifetime: Duration,
}

impl MySqlRefreshTokenStore {
    /// Create a store issuing tokens with the default 30-day lifetime
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_lifetime(pool, Duration::days(REFRESH_TOKEN_EXPIRY_DAYS))
    }

    pub fn with_lifetime(pool: MySqlPool, lifetime: Duration) -> Self {
        Self { pool, lifetime }
    }

    fn row_to_token(row: &MySqlRow) -> Result<RefreshToken, StoreError> {
        let id: String = row.try_get("id").map_err(map_sqlx_error)?;
        let user_id: String = row.try_get("user_id").map_err(map_sqlx_error)?;
        let family_id: String = row.try_get("token_family_id").map_err(map_sqlx_error)?;

        Ok(RefreshToken {
            id: parse_uuid(&id, "id")?,
            user_id: parse_uuid(&user_id, "user_id")?,
            token_family_id: parse_uuid(&family_id, "token_family_id")?,
            token: row.try_get("token").map_err(map_sqlx_error)?,
            created_at_utc: row
                .try_get::<DateTime<Utc>, _>("created_at_utc")
                .map_err(map_sqlx_error)?,
            expire_at_utc: row
                .try_get::<DateTime<Utc>, _>("expire_at_utc")
                .map_err(map_sqlx_error)?,
            is_revoked: row.try_get("is_revoked").map_err(map_sqlx_error)?,
            revoked_at_utc: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at_utc")
                .map_err(map_sqlx_error)?,
            used_at_utc: row
                .try_get::<Option<DateTime<Utc>>, _>("used_at_utc")
                .map_err(map_sqlx_error)?,
        })
    }

    fn rows_to_tokens(rows: Vec<MySqlRow>) -> Result<Vec<RefreshToken>, StoreError> {
        rows.iter().map(Self::row_to_token).collect()
    }

    async fn insert_record<'e, E>(executor: E, token: &RefreshToken) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_family_id, token, is_revoked,
                revoked_at_utc, used_at_utc, expire_at_utc, created_at_utc
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(token.token_family_id.to_string())
            .bind(&token.token)
            .bind(token.is_revoked)
            .bind(token.revoked_at_utc)
            .bind(token.used_at_utc)
            .bind(token.expire_at_utc)
            .bind(token.created_at_utc)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Roll back and hand back the error that caused it
    async fn abort(tx: Transaction<'_, MySql>, error: StoreError) -> StoreError {
        if let Err(rollback_error) = rollback_transaction(tx).await {
            tracing::error!(
                error = %rollback_error,
                "Failed to roll back refresh token rotation"
            );
        }
        error
    }
}

#[async_trait]
impl RefreshTokenStore for MySqlRefreshTokenStore {
    async fn find_active(&self, user_id: Uuid) -> Result<Option<RefreshToken>, StoreError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens \
             WHERE user_id = ? AND is_revoked = FALSE AND used_at_utc IS NULL \
             ORDER BY created_at_utc DESC LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_by_value(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshToken>, StoreError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE user_id = ? AND token = ? LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_by_family(&self, family_id: Uuid) -> Result<Vec<RefreshToken>, StoreError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_family_id = ? ORDER BY created_at_utc ASC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(family_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Self::rows_to_tokens(rows)
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

        Self::insert_record(&self.pool, &record)
            .await
            .map_err(map_sqlx_error)?;

        tracing::debug!(
            user_id = %record.user_id,
            family_id = %record.token_family_id,
            "Inserted refresh token"
        );

        Ok(record)
    }

    async fn rotate(
        &self,
        old: &RefreshToken,
        new_token: String,
    ) -> Result<RefreshToken, StoreError> {
        let mut tx = begin_transaction(&self.pool).await?;
        let now = Utc::now();

        let consumed = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at_utc = ?, used_at_utc = ?
            WHERE id = ? AND is_revoked = FALSE AND used_at_utc IS NULL
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(old.id.to_string())
        .execute(&mut *tx)
        .await;

        match consumed {
            Err(e) => return Err(Self::abort(tx, map_sqlx_error(e)).await),
            Ok(result) if result.rows_affected() == 0 => {
                tracing::debug!(
                    user_id = %old.user_id,
                    family_id = %old.token_family_id,
                    "Refresh token already consumed or revoked"
                );
                return Err(Self::abort(tx, StoreError::ConcurrencyConflict).await);
            }
            Ok(_) => {}
        }

        let successor =
            RefreshToken::new_in_family(old.user_id, new_token, old.token_family_id, self.lifetime);

        if let Err(e) = Self::insert_record(&mut *tx, &successor).await {
            return Err(Self::abort(tx, map_sqlx_error(e)).await);
        }

        commit_transaction(tx).await?;

        Ok(successor)
    }

    async fn revoke_family(&self, family_id: Uuid) -> Result<usize, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at_utc = ?
            WHERE token_family_id = ? AND is_revoked = FALSE
            "#,
        )
        .bind(Utc::now())
        .bind(family_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() as usize)
    }
}
