//! Provider status vocabulary to internal transaction status.

use crate::domain::TransactionStatus;

pub const FRAUD_ACCEPT: &str = "accept";

/// Total and side-effect free: every input yields a status, unseen provider
/// statuses become [`TransactionStatus::Unknown`].
pub fn map_provider_status(transaction_status: &str, fraud_status: Option<&str>) -> TransactionStatus {
    match transaction_status {
        "capture" => match fraud_status {
            Some(FRAUD_ACCEPT) => TransactionStatus::Paid,
            _ => TransactionStatus::Challenge,
        },
        "settlement" => TransactionStatus::Paid,
        "pending" => TransactionStatus::Pending,
        "deny" | "cancel" | "expire" => TransactionStatus::Cancelled,
        "refund" | "partial_refund" => TransactionStatus::Refunded,
        _ => TransactionStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransactionStatus::*;

    #[test]
    fn capture_depends_on_fraud_result() {
        assert_eq!(map_provider_status("capture", Some("accept")), Paid);
        assert_eq!(map_provider_status("capture", Some("challenge")), Challenge);
        assert_eq!(map_provider_status("capture", Some("deny")), Challenge);
        assert_eq!(map_provider_status("capture", None), Challenge);
    }

    #[test]
    fn table_entries() {
        let table = [
            ("settlement", Paid),
            ("pending", Pending),
            ("deny", Cancelled),
            ("cancel", Cancelled),
            ("expire", Cancelled),
            ("refund", Refunded),
            ("partial_refund", Refunded),
        ];

        for (provider, expected) in table {
            assert_eq!(map_provider_status(provider, None), expected, "{}", provider);
            assert_eq!(map_provider_status(provider, Some("accept")), expected, "{}", provider);
        }
    }

    #[test]
    fn unseen_statuses_map_to_unknown() {
        for provider in ["", "authorize", "SETTLEMENT", "chargeback", "capture ", "\u{0000}"] {
            assert_eq!(map_provider_status(provider, Some("accept")), Unknown, "{:?}", provider);
        }
    }
}
