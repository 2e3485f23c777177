//! Webhook domain - signature verification and payload parsing.

mod errors;
mod payload;
mod signature;

pub use errors::WebhookError;
pub use payload::{OrderDetails, OrderTags, PaymentDetails, WebhookData, WebhookPayload};
pub use signature::GatewayWebhookVerifier;
