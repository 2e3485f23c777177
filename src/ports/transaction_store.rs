//! TransactionStore port - storage contract for webhook-derived transactions.
//!
//! The store exposes a single create operation. Referenced Order, FeePlan and
//! Consumer rows are owned by an external system; the store surfaces a
//! dangling reference as a typed not-found error rather than a generic
//! database failure. Idempotency-key collisions are not an error: the store
//! reports them as a `Duplicate` outcome so redelivered webhooks can be
//! acknowledged without writing a second row.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::transaction::NewTransaction;
use crate::domain::webhook::WebhookError;

/// Outcome of a create attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new row was inserted.
    Created(Uuid),
    /// The idempotency key was already recorded; no row was written.
    Duplicate,
}

/// Errors surfaced by a transaction store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced order id does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Referenced fee plan id does not exist.
    #[error("fee plan not found: {0}")]
    FeePlanNotFound(String),

    /// Referenced consumer id does not exist.
    #[error("consumer not found: {0}")]
    ConsumerNotFound(String),

    /// Any other database failure (constraint, connectivity, ...).
    #[error("database error: {0}")]
    Database(String),
}

impl From<StoreError> for WebhookError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrderNotFound(id) => WebhookError::OrderNotFound(id),
            StoreError::FeePlanNotFound(id) => WebhookError::FeePlanNotFound(id),
            StoreError::ConsumerNotFound(id) => WebhookError::ConsumerNotFound(id),
            StoreError::Database(msg) => WebhookError::Database(msg),
        }
    }
}

/// Port for persisting webhook-derived transactions.
///
/// Implementations must enforce uniqueness on the idempotency key with
/// database constraints, not in-process checks, so that concurrent
/// redeliveries cannot race each other into duplicate rows.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a transaction record.
    ///
    /// Returns `CreateOutcome::Duplicate` when the record's idempotency key
    /// has already been stored.
    async fn create(&self, record: NewTransaction) -> Result<CreateOutcome, StoreError>;
}
