//! Legal status transitions for a transaction.

use thiserror::Error;

use super::TransactionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal transition from {from} to {to}")]
pub struct IllegalTransition {
    pub from: TransactionStatus,
    pub to: TransactionStatus,
}

/// Statuses reachable directly from `current`, in display order.
/// The current status itself is not included.
pub fn successors(current: TransactionStatus) -> &'static [TransactionStatus] {
    use TransactionStatus::*;

    match current {
        Pending => &[Paid, Challenge, Cancelled, Expired],
        Challenge => &[Paid, Cancelled],
        Paid => &[Sent, Refunded],
        Sent => &[Completed, Cancelled],
        Completed | Cancelled | Refunded | Expired | Unknown => &[],
    }
}

/// Staying on the current status is always allowed so provider retries are not
/// rejected. `Unknown` is never a valid target.
pub fn check(current: TransactionStatus, next: TransactionStatus) -> Result<(), IllegalTransition> {
    if next != TransactionStatus::Unknown
        && (next == current || successors(current).contains(&next))
    {
        return Ok(());
    }

    Err(IllegalTransition {
        from: current,
        to: next,
    })
}

/// Current status followed by its direct successors.
pub fn allowed_next(current: TransactionStatus) -> Vec<TransactionStatus> {
    let mut allowed = Vec::with_capacity(successors(current).len() + 1);
    allowed.push(current);
    allowed.extend_from_slice(successors(current));
    allowed
}

pub fn is_terminal(status: TransactionStatus) -> bool {
    successors(status).is_empty()
}
