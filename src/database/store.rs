use async_trait::async_trait;
use thiserror::Error;

use crate::auth::UserId;
use crate::database::models::income::{Income, IncomePatch, NewIncome};
use crate::ownership::RecordLookup;

/// Errors from a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connection(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Persistence for income records.
///
/// `update_by_id` and `delete_by_id` only act on records that exist at the
/// moment of the call: they report `None` / `false` instead of creating
/// anything when the id has vanished.
#[async_trait]
pub trait IncomeStore: RecordLookup<Income> + Send + Sync {
    async fn create(&self, owner: &UserId, fields: NewIncome) -> Result<Income, StoreError>;

    async fn update_by_id(&self, id: &str, patch: &IncomePatch) -> Result<Option<Income>, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;

    async fn list_all(&self) -> Result<Vec<Income>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release held connections at shutdown
    async fn close(&self) {}
}
