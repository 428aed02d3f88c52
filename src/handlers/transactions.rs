use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{transition, Transaction, TransactionLog, TransactionStatus};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NextStatuses {
    pub order_id: String,
    pub current: TransactionStatus,
    pub allowed: Vec<TransactionStatus>,
}

#[utoipa::path(
    get,
    path = "/transactions/{order_id}",
    params(("order_id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Transaction", body = Transaction),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .store
        .find_by_order_id(&order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", order_id)))?;

    Ok(Json(json!({ "data": tx })))
}

/// Statuses the transaction may move to next, current status first.
#[utoipa::path(
    get,
    path = "/transactions/{order_id}/next-statuses",
    params(("order_id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Allowed next statuses", body = NextStatuses),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn next_statuses(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .store
        .find_by_order_id(&order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", order_id)))?;

    let next = NextStatuses {
        allowed: transition::allowed_next(tx.status),
        current: tx.status,
        order_id: tx.order_id,
    };

    Ok(Json(json!({ "data": next })))
}

#[utoipa::path(
    get,
    path = "/transactions/{order_id}/logs",
    params(("order_id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Status history, oldest first", body = [TransactionLog]),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let logs = state.store.list_logs(&order_id).await?;
    Ok(Json(json!({ "data": logs })))
}
