//! Adapters - concrete implementations of the ports plus the HTTP surface.

pub mod dry_run;
pub mod http;
pub mod postgres;

pub use dry_run::DryRunTransactionStore;
pub use http::{app_router, AppState};
pub use postgres::PostgresTransactionStore;
