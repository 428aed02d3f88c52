use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::payments::WebhookPayload;
use crate::services::WebhookError;
use crate::AppState;

/// Payment provider notification endpoint.
///
/// The body is parsed by hand so that malformed input still gets the
/// provider-facing `{"message": ...}` shape instead of an extractor rejection.
#[utoipa::path(
    post,
    path = "/webhooks/payment",
    request_body = WebhookPayload,
    responses(
        (status = 200, description = "Notification received"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Invalid signature"),
        (status = 404, description = "Unknown order"),
        (status = 409, description = "Illegal status transition"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Webhooks"
)]
pub async fn payment_notification(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let payload = match WebhookPayload::parse(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected unparsable payment notification");
            return WebhookError::from(e).into_response();
        }
    };

    match state.processor.process(&payload).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "received": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
