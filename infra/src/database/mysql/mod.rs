//! MySQL store implementations.

mod refresh_token_store_impl;
mod user_repository_impl;

pub use refresh_token_store_impl::MySqlRefreshTokenStore;
pub use user_repository_impl::MySqlUserRepository;

use hr_core::errors::StoreError;
use uuid::Uuid;

/// Map a sqlx error onto the store failure kinds
pub(crate) fn map_sqlx_error(error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::ConcurrencyConflict,
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => StoreError::Corrupt {
            message: error.to_string(),
        },
        _ => StoreError::unavailable(error.to_string()),
    }
}

/// Parse a CHAR(36) id column
pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::Corrupt {
        message: format!("Invalid UUID in {}: {}", column, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_unavailable() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable { .. }
        ));
    }

    #[test]
    fn test_missing_column_is_corrupt() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::ColumnNotFound("token".to_string())),
            StoreError::Corrupt { .. }
        ));
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert!(parse_uuid("not-a-uuid", "id").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string(), "id").unwrap(), id);
    }
}
