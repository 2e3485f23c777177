//! Axum router configuration.
//!
//! # Routes
//!
//! - `GET /` - liveness greeting (informational)
//! - `POST /webhook` - gateway webhook delivery (no auth, signature verified)

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{receive_webhook, root, AppState};

/// Create the application router.
///
/// Webhook routes carry no authentication layer; the delivery is
/// authenticated by its signature instead.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/webhook", post(receive_webhook))
        .layer(TraceLayer::new_for_http())
}
