use axum::{
    body::{Body, HttpBody},
    extract::State,
    http::{header::CONTENT_LENGTH, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

const MAX_BODY_LOG_SIZE: usize = 1024; // 1KB limit for body logging
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogSettings {
    pub log_body: bool,
}

pub async fn request_logger_middleware(
    State(settings): State<RequestLogSettings>,
    mut req: Request<Body>,
    next: Next<Body>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&request_id).ok();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    if let Some(value) = &header_value {
        req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let declared_len = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    match declared_len {
        Some(len) if settings.log_body && len <= MAX_BODY_LOG_SIZE => {
            let (parts, mut body) = req.into_parts();
            let mut bytes = Vec::with_capacity(len);
            while let Some(chunk) = body.data().await {
                match chunk {
                    Ok(chunk) => bytes.extend_from_slice(&chunk),
                    Err(e) => {
                        tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
                        break;
                    }
                }
            }

            let sanitized_body = match serde_json::from_slice::<serde_json::Value>(&bytes) {
                Ok(json) => {
                    let sanitized = crate::utils::sanitize::sanitize_json(&json);
                    serde_json::to_string(&sanitized).unwrap_or_else(|_| "[invalid json]".to_string())
                }
                Err(_) => format!("[non-json, {} bytes]", bytes.len()),
            };

            tracing::info!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                body_size = bytes.len(),
                body = %sanitized_body,
                "Incoming request"
            );

            req = Request::from_parts(parts, Body::from(bytes));
        }
        _ => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                "Incoming request"
            );
        }
    }

    let mut response = next.run(req).await;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        latency_ms = start.elapsed().as_millis(),
        "Outgoing response"
    );

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
