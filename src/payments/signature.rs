//! Provider signature check for payment notifications.
//!
//! The provider signs `order_id + status_code + gross_amount + server_key`
//! with SHA-512 and sends the lowercase hex digest as `signature_key`.

use sha2::{Digest, Sha512};

use super::WebhookPayload;

#[derive(Clone)]
pub struct SignatureVerifier {
    server_key: String,
}

impl SignatureVerifier {
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
        }
    }

    pub fn expected_signature(&self, order_id: &str, status_code: &str, gross_amount: &str) -> String {
        let mut hasher = Sha512::new();
        hasher.update(order_id.as_bytes());
        hasher.update(status_code.as_bytes());
        hasher.update(gross_amount.as_bytes());
        hasher.update(self.server_key.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn verify(&self, order_id: &str, status_code: &str, gross_amount: &str, signature: &str) -> bool {
        let expected = self.expected_signature(order_id, status_code, gross_amount);
        secure_eq(expected.as_bytes(), signature.as_bytes())
    }

    pub fn verify_payload(&self, payload: &WebhookPayload) -> bool {
        self.verify(
            &payload.order_id,
            &payload.status_code,
            &payload.gross_amount,
            &payload.signature_key,
        )
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("server_key", &"****")
            .finish()
    }
}

pub fn secure_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0_u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
