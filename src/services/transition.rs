//! Guarded, atomic status changes shared by the webhook path and operator CLI.

use thiserror::Error;
use tracing::debug;

use crate::domain::{transition, Actor, IllegalTransition, Transaction, TransactionStatus};
use crate::ports::{StoreError, TransactionStore};

/// Attempts before a status that keeps moving underneath us is reported as a
/// store failure.
const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("transaction {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Illegal(#[from] IllegalTransition),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TransitionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(order_id) => TransitionError::NotFound(order_id),
            other => TransitionError::Store(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Status moved and one log entry was written.
    Changed {
        from: TransactionStatus,
        transaction: Transaction,
    },
    /// Already at the requested status; a log entry records the repeat.
    Unchanged(Transaction),
}

/// Moves `order_id` to `next` if the transition guard allows it.
///
/// The store compares the status read here against the row it locks; when
/// another writer got there first the guard is re-run against the new status.
pub async fn apply_transition(
    store: &dyn TransactionStore,
    order_id: &str,
    next: TransactionStatus,
    note: &str,
    actor: &Actor,
) -> Result<TransitionOutcome, TransitionError> {
    let mut last_err = None;

    for attempt in 1..=MAX_ATTEMPTS {
        let current = load(store, order_id).await?.status;

        let result = if current == next {
            let note = format!("duplicate notification, {}", note);
            store
                .update_status_and_log(order_id, current, current, &note, actor)
                .await
                .map(TransitionOutcome::Unchanged)
        } else {
            transition::check(current, next)?;
            store
                .update_status_and_log(order_id, current, next, note, actor)
                .await
                .map(|transaction| TransitionOutcome::Changed {
                    from: current,
                    transaction,
                })
        };

        match result {
            Ok(outcome) => return Ok(outcome),
            Err(err @ StoreError::StaleStatus { .. }) => {
                debug!(order_id = %order_id, attempt, error = %err, "Status moved, re-checking");
                last_err = Some(err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(TransitionError::Store(last_err.unwrap_or_else(|| {
        StoreError::Corrupt(format!("no transition attempt made for {}", order_id))
    })))
}

/// Appends a log entry without touching the status.
pub async fn record_note(
    store: &dyn TransactionStore,
    order_id: &str,
    note: &str,
    actor: &Actor,
) -> Result<Transaction, TransitionError> {
    let mut last_err = None;

    for _ in 0..MAX_ATTEMPTS {
        let current = load(store, order_id).await?.status;
        match store
            .update_status_and_log(order_id, current, current, note, actor)
            .await
        {
            Ok(transaction) => return Ok(transaction),
            Err(err @ StoreError::StaleStatus { .. }) => last_err = Some(err),
            Err(err) => return Err(err.into()),
        }
    }

    Err(TransitionError::Store(last_err.unwrap_or_else(|| {
        StoreError::Corrupt(format!("no log attempt made for {}", order_id))
    })))
}

async fn load(store: &dyn TransactionStore, order_id: &str) -> Result<Transaction, TransitionError> {
    store
        .find_by_order_id(order_id)
        .await?
        .ok_or_else(|| TransitionError::NotFound(order_id.to_string()))
}
