pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod payments;
pub mod ports;
pub mod services;
pub mod startup;
pub mod utils;
pub mod validation;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::health::HealthChecks;
use crate::middleware::request_logger::{request_logger_middleware, RequestLogSettings};
use crate::payments::SignatureVerifier;
use crate::ports::TransactionStore;
use crate::services::WebhookProcessor;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub processor: WebhookProcessor,
    pub health: HealthChecks,
}

impl AppState {
    pub fn new(store: Arc<dyn TransactionStore>, verifier: SignatureVerifier, health: HealthChecks) -> Self {
        Self {
            processor: WebhookProcessor::new(store.clone(), verifier),
            store,
            health,
        }
    }
}

pub fn create_app(state: AppState, log_settings: RequestLogSettings) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        .route("/webhooks/payment", post(handlers::webhook::payment_notification))
        .route("/transactions/:order_id", get(handlers::transactions::get_transaction))
        .route(
            "/transactions/:order_id/next-statuses",
            get(handlers::transactions::next_statuses),
        )
        .route("/transactions/:order_id/logs", get(handlers::transactions::list_logs))
        .layer(axum::middleware::from_fn_with_state(
            log_settings,
            request_logger_middleware,
        ))
        .with_state(state)
}

/// CORS for the read endpoints consumed by the storefront UI.
pub fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    match allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
        None => layer.allow_origin(Any),
    }
}
