//! Postgres implementation of TransactionStore.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Actor, Transaction, TransactionLog, TransactionStatus};
use crate::ports::{StoreError, StoreResult, TransactionStore};

/// Postgres-backed transaction store.
#[derive(Clone)]
pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn find_by_order_id(&self, order_id: &str) -> StoreResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT order_id, status, total_amount, user_id, created_at, updated_at
            FROM transactions
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn update_status_and_log(
        &self,
        order_id: &str,
        expected: TransactionStatus,
        next: TransactionStatus,
        note: &str,
        actor: &Actor,
    ) -> StoreResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent deliveries for the same order.
        let current: Option<String> = sqlx::query_scalar(
            "SELECT status FROM transactions WHERE order_id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;

        let current = match current {
            Some(raw) => parse_status(&raw)?,
            None => {
                tx.rollback().await?;
                return Err(StoreError::NotFound(order_id.to_string()));
            }
        };

        if current != expected {
            tx.rollback().await?;
            return Err(StoreError::StaleStatus {
                expected,
                actual: current,
            });
        }

        // The status change and its log entry share one timestamp.
        let entry = TransactionLog::new(order_id, next, note.to_string(), actor);

        let updated = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions
            SET status = $2, updated_at = $3
            WHERE order_id = $1
            RETURNING order_id, status, total_amount, user_id, created_at, updated_at
            "#,
        )
        .bind(order_id)
        .bind(next.as_str())
        .bind(entry.created_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO transaction_logs (id, order_id, status, note, author, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.order_id)
        .bind(entry.status.as_str())
        .bind(&entry.note)
        .bind(&entry.author)
        .bind(entry.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        updated.into_domain()
    }

    async fn list_logs(&self, order_id: &str) -> StoreResult<Vec<TransactionLog>> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM transactions WHERE order_id = $1)",
        )
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Err(StoreError::NotFound(order_id.to_string()));
        }

        let rows = sqlx::query_as::<_, LogRow>(
            r#"
            SELECT id, order_id, status, note, author, created_at
            FROM transaction_logs
            WHERE order_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LogRow::into_domain).collect()
    }
}

fn parse_status(raw: &str) -> StoreResult<TransactionStatus> {
    raw.parse()
        .map_err(|e: crate::domain::ParseStatusError| StoreError::Corrupt(e.to_string()))
}

/// Internal row types for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    order_id: String,
    status: String,
    total_amount: BigDecimal,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> StoreResult<Transaction> {
        Ok(Transaction {
            status: parse_status(&self.status)?,
            order_id: self.order_id,
            total_amount: self.total_amount,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    id: Uuid,
    order_id: String,
    status: String,
    note: String,
    author: String,
    created_at: DateTime<Utc>,
}

impl LogRow {
    fn into_domain(self) -> StoreResult<TransactionLog> {
        Ok(TransactionLog {
            id: self.id,
            status: parse_status(&self.status)?,
            order_id: self.order_id,
            note: self.note,
            author: self.author,
            created_at: self.created_at,
        })
    }
}
