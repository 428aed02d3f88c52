//! Storage port for transactions and their audit log.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Actor, Transaction, TransactionLog, TransactionStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction {0} not found")]
    NotFound(String),

    #[error("transaction status moved: expected {expected}, found {actual}")]
    StaleStatus {
        expected: TransactionStatus,
        actual: TransactionStatus,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt stored record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_order_id(&self, order_id: &str) -> StoreResult<Option<Transaction>>;

    /// Sets the status to `next` and appends exactly one log entry, as one unit.
    ///
    /// Fails with [`StoreError::StaleStatus`] without writing anything when the
    /// stored status is no longer `expected`. Passing `next == expected` records
    /// a log entry without changing the status.
    async fn update_status_and_log(
        &self,
        order_id: &str,
        expected: TransactionStatus,
        next: TransactionStatus,
        note: &str,
        actor: &Actor,
    ) -> StoreResult<Transaction>;

    /// Log entries for a transaction, oldest first.
    async fn list_logs(&self, order_id: &str) -> StoreResult<Vec<TransactionLog>>;
}
