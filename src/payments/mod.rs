pub mod payload;
pub mod signature;
pub mod status_mapper;

pub use payload::WebhookPayload;
pub use signature::SignatureVerifier;
