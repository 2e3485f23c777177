//! PostgreSQL adapters.

mod transaction_store;

pub use transaction_store::PostgresTransactionStore;
