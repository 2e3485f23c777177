//! Webhook error types.
//!
//! Defines all error conditions that can occur during webhook ingestion,
//! with HTTP status code mapping and stable error codes for the response body.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook ingestion.
///
/// The gateway-facing contract is deliberately coarse: every failure is
/// answered with `400 Bad Request` and a structured error body. The variants
/// exist for diagnostics and logging, not for the caller to branch on.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A required header was not present on the request.
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// The request carried no body bytes.
    #[error("Request body is empty")]
    EmptyBody,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The timestamp header is not a valid epoch-millisecond value.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Failed to parse the webhook payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Referenced order does not exist in storage.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Referenced fee plan does not exist in storage.
    #[error("Fee plan not found: {0}")]
    FeePlanNotFound(String),

    /// Referenced consumer does not exist in storage.
    #[error("Consumer not found: {0}")]
    ConsumerNotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Maps the error to an HTTP status code.
    ///
    /// All failures are client-facing `400 Bad Request`: the gateway boundary
    /// does not distinguish verification failures from persistence failures,
    /// and redelivery is entirely the gateway's own retry policy.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Returns a stable machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MissingHeader(_) => "MISSING_HEADER",
            WebhookError::EmptyBody => "EMPTY_BODY",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::InvalidTimestamp(_) => "INVALID_TIMESTAMP",
            WebhookError::ParseError(_) => "PAYLOAD_PARSE_FAILED",
            WebhookError::MissingField(_) => "MISSING_FIELD",
            WebhookError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            WebhookError::FeePlanNotFound(_) => "FEE_PLAN_NOT_FOUND",
            WebhookError::ConsumerNotFound(_) => "CONSUMER_NOT_FOUND",
            WebhookError::Database(_) => "STORAGE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_displays_header_name() {
        let err = WebhookError::MissingHeader("x-webhook-signature");
        assert_eq!(
            format!("{}", err),
            "Missing required header: x-webhook-signature"
        );
    }

    #[test]
    fn invalid_signature_displays_correctly() {
        let err = WebhookError::InvalidSignature;
        assert_eq!(format!("{}", err), "Invalid signature");
    }

    #[test]
    fn parse_error_displays_message() {
        let err = WebhookError::ParseError("unexpected end of input".to_string());
        assert_eq!(format!("{}", err), "Parse error: unexpected end of input");
    }

    #[test]
    fn missing_field_displays_field_path() {
        let err = WebhookError::MissingField("order_tags.feePlanId");
        assert_eq!(format!("{}", err), "Missing field: order_tags.feePlanId");
    }

    #[test]
    fn all_errors_map_to_bad_request() {
        let errors = [
            WebhookError::MissingHeader("x-webhook-timestamp"),
            WebhookError::EmptyBody,
            WebhookError::InvalidSignature,
            WebhookError::InvalidTimestamp("abc".to_string()),
            WebhookError::ParseError("bad json".to_string()),
            WebhookError::MissingField("order_id"),
            WebhookError::OrderNotFound("O1".to_string()),
            WebhookError::FeePlanNotFound("F1".to_string()),
            WebhookError::ConsumerNotFound("C1".to_string()),
            WebhookError::Database("connection lost".to_string()),
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn codes_are_distinct_per_failure_class() {
        assert_eq!(WebhookError::InvalidSignature.code(), "INVALID_SIGNATURE");
        assert_eq!(
            WebhookError::OrderNotFound("O1".to_string()).code(),
            "ORDER_NOT_FOUND"
        );
        assert_ne!(
            WebhookError::InvalidSignature.code(),
            WebhookError::Database("x".to_string()).code()
        );
    }
}
