//! In-memory implementation of TransactionStore.
//!
//! One mutex covers both maps, so the check-and-write in
//! `update_status_and_log` is atomic per call.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::{Actor, Transaction, TransactionLog, TransactionStatus};
use crate::ports::{StoreError, StoreResult, TransactionStore};

#[derive(Default)]
struct Inner {
    transactions: HashMap<String, Transaction>,
    logs: HashMap<String, Vec<TransactionLog>>,
}

#[derive(Default)]
pub struct InMemoryTransactionStore {
    inner: Mutex<Inner>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a transaction as the storefront would when an order is created.
    pub async fn insert(&self, tx: Transaction) {
        let mut inner = self.inner.lock().await;
        inner.logs.entry(tx.order_id.clone()).or_default();
        inner.transactions.insert(tx.order_id.clone(), tx);
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find_by_order_id(&self, order_id: &str) -> StoreResult<Option<Transaction>> {
        Ok(self.inner.lock().await.transactions.get(order_id).cloned())
    }

    async fn update_status_and_log(
        &self,
        order_id: &str,
        expected: TransactionStatus,
        next: TransactionStatus,
        note: &str,
        actor: &Actor,
    ) -> StoreResult<Transaction> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let tx = inner
            .transactions
            .get_mut(order_id)
            .ok_or_else(|| StoreError::NotFound(order_id.to_string()))?;

        if tx.status != expected {
            return Err(StoreError::StaleStatus {
                expected,
                actual: tx.status,
            });
        }

        let entry = TransactionLog::new(order_id, next, note.to_string(), actor);
        tx.status = next;
        tx.updated_at = entry.created_at;
        let updated = tx.clone();

        inner.logs.entry(order_id.to_string()).or_default().push(entry);

        Ok(updated)
    }

    async fn list_logs(&self, order_id: &str) -> StoreResult<Vec<TransactionLog>> {
        let inner = self.inner.lock().await;
        if !inner.transactions.contains_key(order_id) {
            return Err(StoreError::NotFound(order_id.to_string()));
        }

        Ok(inner.logs.get(order_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    async fn seeded() -> InMemoryTransactionStore {
        let store = InMemoryTransactionStore::new();
        store
            .insert(Transaction::new("ORD-1", BigDecimal::from(10000), "user-1"))
            .await;
        store
    }

    #[tokio::test]
    async fn update_writes_status_and_one_log() {
        let store = seeded().await;

        let updated = store
            .update_status_and_log(
                "ORD-1",
                TransactionStatus::Pending,
                TransactionStatus::Paid,
                "webhook: settlement",
                &Actor::System,
            )
            .await
            .unwrap();

        assert_eq!(updated.status, TransactionStatus::Paid);
        let logs = store.list_logs("ORD-1").await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, TransactionStatus::Paid);
        assert_eq!(logs[0].author, "system");
    }

    #[tokio::test]
    async fn stale_expected_status_writes_nothing() {
        let store = seeded().await;

        let err = store
            .update_status_and_log(
                "ORD-1",
                TransactionStatus::Paid,
                TransactionStatus::Sent,
                "note",
                &Actor::System,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::StaleStatus {
                expected: TransactionStatus::Paid,
                actual: TransactionStatus::Pending
            }
        ));
        assert!(store.list_logs("ORD-1").await.unwrap().is_empty());
        let tx = store.find_by_order_id("ORD-1").await.unwrap().unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let store = seeded().await;

        assert!(store.find_by_order_id("ORD-404").await.unwrap().is_none());
        assert!(matches!(
            store.list_logs("ORD-404").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store
                .update_status_and_log(
                    "ORD-404",
                    TransactionStatus::Pending,
                    TransactionStatus::Paid,
                    "note",
                    &Actor::System,
                )
                .await,
            Err(StoreError::NotFound(_))
        ));
    }
}
