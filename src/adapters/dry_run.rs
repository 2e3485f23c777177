//! Logging-only TransactionStore for dry-run mode.
//!
//! When `server.dry_run` is set, the service verifies and parses webhooks
//! end to end but acknowledges them without touching a database. Useful for
//! pointing the gateway sandbox at a fresh deployment before the schema
//! exists.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::transaction::NewTransaction;
use crate::ports::{CreateOutcome, StoreError, TransactionStore};

/// TransactionStore that logs the record instead of persisting it.
#[derive(Debug, Default)]
pub struct DryRunTransactionStore {
    accepted: AtomicU64,
}

impl DryRunTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records accepted since startup.
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TransactionStore for DryRunTransactionStore {
    async fn create(&self, record: NewTransaction) -> Result<CreateOutcome, StoreError> {
        let id = Uuid::new_v4();
        self.accepted.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            transaction_id = %id,
            external_payment_id = %record.external_payment_id,
            order_id = %record.order_id,
            fee_plan_id = %record.fee_plan_id,
            consumer_id = record.consumer_id.as_deref().unwrap_or("-"),
            status = %record.status,
            amount = record.amount,
            "dry-run: transaction accepted without persistence"
        );

        Ok(CreateOutcome::Created(id))
    }
}
