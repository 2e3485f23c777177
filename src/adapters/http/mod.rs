//! HTTP adapter - the gateway-facing surface.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::app_router;
