//! Transaction helpers for the MySQL stores.

use sqlx::{MySql, MySqlPool, Transaction};

use hr_core::errors::StoreError;

use super::mysql::map_sqlx_error;

/// Begin a new database transaction
pub async fn begin_transaction(pool: &MySqlPool) -> Result<Transaction<'_, MySql>, StoreError> {
    pool.begin().await.map_err(map_sqlx_error)
}

/// Commit all changes made within the transaction
pub async fn commit_transaction(tx: Transaction<'_, MySql>) -> Result<(), StoreError> {
    tx.commit().await.map_err(map_sqlx_error)
}

/// Undo all changes made within the transaction
pub async fn rollback_transaction(tx: Transaction<'_, MySql>) -> Result<(), StoreError> {
    tx.rollback().await.map_err(map_sqlx_error)
}
