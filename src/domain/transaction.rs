//! Transaction domain entities.
//! Framework-agnostic representation of an order and its status history.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle states of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    /// Captured by the provider but held for fraud review.
    Challenge,
    Paid,
    Sent,
    Completed,
    Cancelled,
    Refunded,
    Expired,
    Unknown,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 9] = [
        TransactionStatus::Pending,
        TransactionStatus::Challenge,
        TransactionStatus::Paid,
        TransactionStatus::Sent,
        TransactionStatus::Completed,
        TransactionStatus::Cancelled,
        TransactionStatus::Refunded,
        TransactionStatus::Expired,
        TransactionStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Challenge => "CHALLENGE",
            TransactionStatus::Paid => "PAID",
            TransactionStatus::Sent => "SENT",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Cancelled => "CANCELLED",
            TransactionStatus::Refunded => "REFUNDED",
            TransactionStatus::Expired => "EXPIRED",
            TransactionStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized transaction status '{}'", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for TransactionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        TransactionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Who caused a status change. Passed explicitly down to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    System,
    Operator(String),
}

impl Actor {
    pub fn as_author(&self) -> String {
        match self {
            Actor::System => "system".to_string(),
            Actor::Operator(name) => format!("operator:{}", name),
        }
    }
}

/// Domain entity representing an order's payment transaction.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Transaction {
    pub order_id: String,
    pub status: TransactionStatus,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(order_id: impl Into<String>, total_amount: BigDecimal, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            order_id: order_id.into(),
            status: TransactionStatus::Pending,
            total_amount,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Immutable audit record of one status notification applied to a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TransactionLog {
    pub id: Uuid,
    pub order_id: String,
    pub status: TransactionStatus,
    pub note: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionLog {
    pub fn new(order_id: &str, status: TransactionStatus, note: String, actor: &Actor) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: order_id.to_string(),
            status,
            note,
            author: actor.as_author(),
            created_at: Utc::now(),
        }
    }
}
