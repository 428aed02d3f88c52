use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{Actor, IllegalTransition, Transaction, TransactionStatus};
use crate::payments::{status_mapper, SignatureVerifier, WebhookPayload};
use crate::ports::{StoreError, TransactionStore};
use crate::services::transition::{self, TransitionError, TransitionOutcome};
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ValidationError),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("unknown order {0}")]
    UnknownOrder(String),

    #[error(transparent)]
    IllegalTransition(IllegalTransition),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<TransitionError> for WebhookError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotFound(order_id) => WebhookError::UnknownOrder(order_id),
            TransitionError::Illegal(illegal) => WebhookError::IllegalTransition(illegal),
            TransitionError::Store(store) => WebhookError::Store(store),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// Status changed to the mapped value.
    Applied {
        from: TransactionStatus,
        transaction: Transaction,
    },
    /// Re-delivery of a notification already applied.
    Duplicate(Transaction),
    /// Provider status outside the mapping table; recorded, status untouched.
    UnrecognizedStatus(Transaction),
}

/// Verifies, maps and applies one payment notification.
#[derive(Clone)]
pub struct WebhookProcessor {
    store: Arc<dyn TransactionStore>,
    verifier: SignatureVerifier,
}

impl WebhookProcessor {
    pub fn new(store: Arc<dyn TransactionStore>, verifier: SignatureVerifier) -> Self {
        Self { store, verifier }
    }

    pub async fn process(&self, payload: &WebhookPayload) -> Result<WebhookOutcome, WebhookError> {
        let order_id = payload.order_id.as_str();

        if !self.verifier.verify_payload(payload) {
            warn!(
                order_id = %order_id,
                status_code = %payload.status_code,
                "Rejected payment notification with invalid signature"
            );
            return Err(WebhookError::InvalidSignature);
        }

        let mapped = status_mapper::map_provider_status(
            &payload.transaction_status,
            payload.fraud_status.as_deref(),
        );
        let note = payload.note();
        let actor = Actor::System;

        let result = if mapped == TransactionStatus::Unknown {
            warn!(
                order_id = %order_id,
                transaction_status = %payload.transaction_status,
                fraud_status = ?payload.fraud_status,
                "Unrecognized provider status, leaving transaction untouched"
            );
            let note = format!("unrecognized provider status, {}", note);
            transition::record_note(self.store.as_ref(), order_id, &note, &actor)
                .await
                .map(WebhookOutcome::UnrecognizedStatus)
        } else {
            transition::apply_transition(self.store.as_ref(), order_id, mapped, &note, &actor)
                .await
                .map(|outcome| match outcome {
                    TransitionOutcome::Changed { from, transaction } => {
                        WebhookOutcome::Applied { from, transaction }
                    }
                    TransitionOutcome::Unchanged(transaction) => WebhookOutcome::Duplicate(transaction),
                })
        };

        match result {
            Ok(outcome) => {
                match &outcome {
                    WebhookOutcome::Applied { from, transaction } => info!(
                        order_id = %order_id,
                        from = %from,
                        to = %transaction.status,
                        provider_status = %payload.transaction_status,
                        "Payment notification applied"
                    ),
                    WebhookOutcome::Duplicate(transaction) => info!(
                        order_id = %order_id,
                        status = %transaction.status,
                        "Duplicate payment notification"
                    ),
                    WebhookOutcome::UnrecognizedStatus(_) => {}
                }
                Ok(outcome)
            }
            Err(err) => {
                let err = WebhookError::from(err);
                match &err {
                    WebhookError::UnknownOrder(_) => {
                        warn!(order_id = %order_id, "Payment notification for unknown order")
                    }
                    WebhookError::IllegalTransition(illegal) => warn!(
                        order_id = %order_id,
                        from = %illegal.from,
                        to = %illegal.to,
                        provider_status = %payload.transaction_status,
                        "Payment notification needs manual review: {}",
                        illegal
                    ),
                    other => error!(order_id = %order_id, error = %other, "Payment notification failed"),
                }
                Err(err)
            }
        }
    }
}
