//! HTTP handlers for the webhook surface.
//!
//! The webhook endpoint takes the body as `axum::body::Bytes`, which hands
//! the handler the exact byte sequence received on the wire regardless of
//! content type. No framework JSON extractor is involved: any
//! re-serialization, even a semantically lossless one, would change the
//! bytes and break signature verification.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use serde::Serialize;

use crate::application::{IngestWebhookCommand, IngestWebhookHandler};
use crate::domain::webhook::WebhookError;

/// Shared state for the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestWebhookHandler>,
}

impl AppState {
    pub fn new(ingest: Arc<IngestWebhookHandler>) -> Self {
        Self { ingest }
    }
}

/// `GET /` - liveness greeting.
///
/// The body content is informational only; callers must not depend on it.
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "webhook ingest service is running" }))
}

/// `POST /webhook` - accept a gateway webhook delivery.
///
/// Responds `200 OK` with an empty body on success or idempotent replay, and
/// `400 Bad Request` with a structured error body on any failure.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let signature = require_header(&headers, "x-webhook-signature")?;
    let timestamp = require_header(&headers, "x-webhook-timestamp")?;

    if body.is_empty() {
        return Err(WebhookError::EmptyBody.into());
    }

    let cmd = IngestWebhookCommand {
        payload: body.to_vec(),
        signature,
        timestamp,
        attempt: optional_numeric_header(&headers, "x-webhook-attempt"),
        version: optional_header(&headers, "x-webhook-version"),
        idempotency_key: optional_header(&headers, "x-idempotency-key"),
    };

    state.ingest.handle(cmd).await?;

    Ok(StatusCode::OK)
}

fn require_header(headers: &HeaderMap, name: &'static str) -> Result<String, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| WebhookError::MissingHeader(name).into())
}

fn optional_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The attempt counter is recorded but never acted on, so a value that does
/// not parse is dropped rather than rejected.
fn optional_numeric_header(headers: &HeaderMap, name: &str) -> Option<i32> {
    optional_header(headers, name).and_then(|v| v.parse().ok())
}

// ════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(WebhookError);

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

/// Structured error body: `{"error": {"code", "message"}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(code = self.0.code(), error = %self.0, "webhook rejected");

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.0.code(),
                message: self.0.to_string(),
            },
        };
        (self.0.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn require_header_returns_value() {
        let map = headers(&[("x-webhook-signature", "sig")]);
        assert_eq!(
            require_header(&map, "x-webhook-signature").unwrap(),
            "sig"
        );
    }

    #[test]
    fn require_header_rejects_missing() {
        let map = HeaderMap::new();
        assert!(require_header(&map, "x-webhook-signature").is_err());
    }

    #[test]
    fn require_header_rejects_empty_value() {
        let map = headers(&[("x-webhook-timestamp", "")]);
        assert!(require_header(&map, "x-webhook-timestamp").is_err());
    }

    #[test]
    fn optional_numeric_header_parses_attempt() {
        let map = headers(&[("x-webhook-attempt", "3")]);
        assert_eq!(optional_numeric_header(&map, "x-webhook-attempt"), Some(3));
    }

    #[test]
    fn optional_numeric_header_drops_garbage() {
        let map = headers(&[("x-webhook-attempt", "third")]);
        assert_eq!(optional_numeric_header(&map, "x-webhook-attempt"), None);
    }

    #[test]
    fn optional_header_absent_is_none() {
        let map = HeaderMap::new();
        assert_eq!(optional_header(&map, "x-idempotency-key"), None);
    }

    #[test]
    fn error_response_serializes_structured_shape() {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: "INVALID_SIGNATURE",
                message: "Invalid signature".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "INVALID_SIGNATURE");
        assert_eq!(json["error"]["message"], "Invalid signature");
    }
}
