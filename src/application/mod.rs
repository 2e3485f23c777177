//! Application layer - orchestration of the webhook ingest flow.

mod ingest_webhook;

pub use ingest_webhook::{IngestOutcome, IngestWebhookCommand, IngestWebhookHandler};
