pub mod transactions;
pub mod webhook;

use crate::health::HealthResponse;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        webhook::payment_notification,
        transactions::get_transaction,
        transactions::next_statuses,
        transactions::list_logs,
    ),
    components(schemas(
        HealthResponse,
        crate::health::DependencyStatus,
        crate::payments::WebhookPayload,
        crate::domain::Transaction,
        crate::domain::TransactionLog,
        crate::domain::TransactionStatus,
        transactions::NextStatuses,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Webhooks", description = "Payment provider notifications"),
        (name = "Transactions", description = "Transaction status reads")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = state.health.run().await;

    let status_code = if response.status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
