use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ports::StoreError;
use crate::services::WebhookError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(order_id) => {
                AppError::NotFound(format!("Transaction {} not found", order_id))
            }
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Store(_) => {
                tracing::error!(error = %self, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,
            WebhookError::UnknownOrder(_) => StatusCode::NOT_FOUND,
            WebhookError::IllegalTransition(_) => StatusCode::CONFLICT,
            WebhookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body text sent to the provider. Carries no internal detail.
    pub fn public_message(&self) -> String {
        match self {
            WebhookError::InvalidPayload(err) => format!("Invalid Payload: {}", err),
            WebhookError::InvalidSignature => "Invalid Signature".to_string(),
            WebhookError::UnknownOrder(_) => "Transaction Not Found".to_string(),
            WebhookError::IllegalTransition(illegal) => illegal.to_string(),
            WebhookError::Store(_) => "Internal Server Error".to_string(),
        }
    }
}

/// Provider-facing responses use a bare `{"message": ...}` body.
impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "message": self.public_message() }));
        (self.status_code(), body).into_response()
    }
}
