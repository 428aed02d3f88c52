use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{
    sanitize_string, validate_decimal_string, validate_digits, validate_max_len,
    validate_required, ValidationError, ORDER_ID_MAX_LEN, PROVIDER_STATUS_MAX_LEN,
    SIGNATURE_MAX_LEN, STATUS_CODE_MAX_LEN, STATUS_MESSAGE_MAX_LEN,
};

/// Payment notification as posted by the provider.
///
/// The provider sends many more fields than these; extra keys are ignored.
/// `gross_amount` stays a string because the signature covers its exact text.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WebhookPayload {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl WebhookPayload {
    /// Parses and validates a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        let payload: WebhookPayload = serde_json::from_slice(body)
            .map_err(|e| ValidationError::new("body", e.to_string()))?;
        payload.validate()?;
        Ok(payload)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("order_id", &self.order_id)?;
        validate_max_len("order_id", &self.order_id, ORDER_ID_MAX_LEN)?;

        validate_required("status_code", &self.status_code)?;
        validate_max_len("status_code", &self.status_code, STATUS_CODE_MAX_LEN)?;
        validate_digits("status_code", &self.status_code)?;

        validate_decimal_string("gross_amount", &self.gross_amount)?;

        validate_required("signature_key", &self.signature_key)?;
        validate_max_len("signature_key", &self.signature_key, SIGNATURE_MAX_LEN)?;

        validate_required("transaction_status", &self.transaction_status)?;
        validate_max_len(
            "transaction_status",
            &self.transaction_status,
            PROVIDER_STATUS_MAX_LEN,
        )?;

        if let Some(fraud_status) = &self.fraud_status {
            validate_max_len("fraud_status", fraud_status, PROVIDER_STATUS_MAX_LEN)?;
        }
        if let Some(message) = &self.status_message {
            validate_max_len("status_message", message, STATUS_MESSAGE_MAX_LEN)?;
        }

        Ok(())
    }

    /// Audit note recorded with the resulting log entry.
    pub fn note(&self) -> String {
        let status = sanitize_string(&self.transaction_status);
        match self.status_message.as_deref().map(sanitize_string) {
            Some(message) if !message.is_empty() => format!("webhook: {} ({})", status, message),
            _ => format!("webhook: {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn valid() -> serde_json::Value {
        json!({
            "order_id": "ORD-1",
            "status_code": "200",
            "gross_amount": "10000.00",
            "signature_key": "abc123",
            "transaction_status": "settlement",
            "status_message": "Success, transaction is found",
            "payment_type": "bank_transfer",
            "transaction_time": "2024-01-01 10:00:00"
        })
    }

    #[test]
    fn parses_provider_body_with_extra_fields() {
        let payload = WebhookPayload::parse(&body(valid())).unwrap();
        assert_eq!(payload.order_id, "ORD-1");
        assert_eq!(payload.gross_amount, "10000.00");
        assert!(payload.fraud_status.is_none());
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("signature_key");
        assert!(WebhookPayload::parse(&body(value)).is_err());
    }

    #[test]
    fn rejects_numeric_gross_amount() {
        let mut value = valid();
        value["gross_amount"] = json!(10000.0);
        assert!(WebhookPayload::parse(&body(value)).is_err());
    }

    #[test]
    fn rejects_malformed_fields() {
        let mut value = valid();
        value["status_code"] = json!("OK");
        let err = WebhookPayload::parse(&body(value)).unwrap_err();
        assert_eq!(err.field, "status_code");

        let mut value = valid();
        value["order_id"] = json!("  ");
        let err = WebhookPayload::parse(&body(value)).unwrap_err();
        assert_eq!(err.field, "order_id");
    }

    #[test]
    fn rejects_non_json() {
        let err = WebhookPayload::parse(b"order_id=ORD-1").unwrap_err();
        assert_eq!(err.field, "body");
    }

    #[test]
    fn note_carries_raw_status_and_message() {
        let payload = WebhookPayload::parse(&body(valid())).unwrap();
        assert_eq!(payload.note(), "webhook: settlement (Success, transaction is found)");

        let mut value = valid();
        value.as_object_mut().unwrap().remove("status_message");
        let payload = WebhookPayload::parse(&body(value)).unwrap();
        assert_eq!(payload.note(), "webhook: settlement");
    }
}
