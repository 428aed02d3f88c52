pub mod transition;
pub mod webhook_processor;

pub use transition::{apply_transition, TransitionError, TransitionOutcome};
pub use webhook_processor::{WebhookError, WebhookOutcome, WebhookProcessor};
