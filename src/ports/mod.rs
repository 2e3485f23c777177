//! Ports - interfaces between the application core and its collaborators.

mod transaction_store;

pub use transaction_store::{CreateOutcome, StoreError, TransactionStore};
