//! IngestWebhookHandler - command handler for gateway webhook deliveries.
//!
//! Orchestrates the single flow this service exists for: verify the
//! signature over the raw bytes, parse the payload, project it onto a
//! transaction record, and hand it to the store. The handler has two logical
//! transitions (unverified -> verified -> persisted) and no retries,
//! intermediate states, or cancellation.

use std::sync::Arc;

use crate::domain::transaction::{parse_webhook_timestamp, DeliveryMeta, NewTransaction};
use crate::domain::webhook::{GatewayWebhookVerifier, WebhookError, WebhookPayload};
use crate::ports::{CreateOutcome, TransactionStore};

/// Command to ingest a single webhook delivery.
///
/// Header presence is validated at the HTTP boundary; by the time a command
/// exists, signature and timestamp strings are known to be present.
#[derive(Debug, Clone)]
pub struct IngestWebhookCommand {
    /// Raw webhook body, byte-for-byte as received.
    pub payload: Vec<u8>,
    /// `x-webhook-signature` header value.
    pub signature: String,
    /// `x-webhook-timestamp` header value (epoch milliseconds).
    pub timestamp: String,
    /// `x-webhook-attempt` header value, when sent and numeric.
    pub attempt: Option<i32>,
    /// `x-webhook-version` header value.
    pub version: Option<String>,
    /// `x-idempotency-key` header value.
    pub idempotency_key: Option<String>,
}

/// Result of ingesting a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A transaction row was created.
    Created(uuid::Uuid),
    /// The delivery was a replay of a recorded idempotency key; acknowledged
    /// without a second write.
    Replayed,
}

/// Handler for ingesting gateway webhooks.
pub struct IngestWebhookHandler {
    verifier: GatewayWebhookVerifier,
    store: Arc<dyn TransactionStore>,
}

impl IngestWebhookHandler {
    pub fn new(verifier: GatewayWebhookVerifier, store: Arc<dyn TransactionStore>) -> Self {
        Self { verifier, store }
    }

    /// Processes one webhook delivery.
    ///
    /// # Errors
    ///
    /// Any `WebhookError`; the HTTP boundary maps all of them to
    /// `400 Bad Request` with a structured body. The store is never invoked
    /// unless verification succeeded.
    pub async fn handle(&self, cmd: IngestWebhookCommand) -> Result<IngestOutcome, WebhookError> {
        if cmd.payload.is_empty() {
            return Err(WebhookError::EmptyBody);
        }

        // 1. Verify the signature over the exact bytes received.
        self.verifier
            .verify(&cmd.signature, &cmd.payload, &cmd.timestamp)?;

        // 2. Only a verified body is ever parsed.
        let received_at = parse_webhook_timestamp(&cmd.timestamp)?;
        let payload = WebhookPayload::parse(&cmd.payload)?;

        // 3. Project onto the transaction record.
        let record = NewTransaction::from_webhook(
            &payload,
            &cmd.payload,
            DeliveryMeta {
                signature: cmd.signature,
                received_at,
                attempt: cmd.attempt,
                version: cmd.version,
                idempotency_key: cmd.idempotency_key,
            },
        )?;

        let order_id = record.order_id.clone();
        let payment_id = record.external_payment_id.clone();

        // 4. Single blocking point: the storage write.
        let outcome = self.store.create(record).await?;

        match outcome {
            CreateOutcome::Created(id) => {
                tracing::info!(
                    transaction_id = %id,
                    order_id = %order_id,
                    external_payment_id = %payment_id,
                    "webhook ingested"
                );
                Ok(IngestOutcome::Created(id))
            }
            CreateOutcome::Duplicate => {
                tracing::info!(
                    order_id = %order_id,
                    external_payment_id = %payment_id,
                    "duplicate webhook delivery acknowledged"
                );
                Ok(IngestOutcome::Replayed)
            }
        }
    }
}
