//! Gateway webhook payload types.
//!
//! Defines the structures for parsing gateway webhook payloads. Only the
//! fields this service projects onto a transaction are typed; everything the
//! gateway may add around them (gateway details, offers, error details,
//! terminal details) is carried as opaque JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::errors::WebhookError;

/// A parsed gateway webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Event data envelope.
    pub data: WebhookData,
}

/// The `data` envelope of a webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    /// Payment details for the event.
    pub payment: PaymentDetails,

    /// The order this payment belongs to.
    pub order: OrderDetails,

    /// Opaque gateway-side processing details.
    #[serde(default)]
    pub payment_gateway_details: Option<serde_json::Value>,

    /// Offers applied to the payment. May be absent or null.
    #[serde(default)]
    pub payment_offers: Option<serde_json::Value>,

    /// Error details for failed payments.
    #[serde(default)]
    pub error_details: Option<serde_json::Value>,

    /// Terminal details for point-of-sale payments.
    #[serde(default)]
    pub terminal_details: Option<serde_json::Value>,
}

/// Payment fields projected onto the transaction record.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentDetails {
    /// Gateway-assigned payment identifier. The gateway sends this as a
    /// number in some API versions and as a string in others.
    #[serde(deserialize_with = "string_or_number")]
    pub cf_payment_id: String,

    /// Payment amount.
    pub payment_amount: f64,

    /// Payment status (e.g. `SUCCESS`, `FAILED`, `USER_DROPPED`).
    pub payment_status: String,

    /// When the gateway recorded the payment.
    #[serde(default)]
    pub payment_time: Option<DateTime<Utc>>,

    /// ISO currency code.
    #[serde(default)]
    pub payment_currency: Option<String>,

    /// Human-readable status message.
    #[serde(default)]
    pub payment_message: Option<String>,

    /// Bank-side reference number.
    #[serde(default)]
    pub bank_reference: Option<String>,

    /// Instrument used for the payment (card, upi, netbanking, ...).
    #[serde(default)]
    pub payment_method: Option<serde_json::Value>,

    /// Instrument group label.
    #[serde(default)]
    pub payment_group: Option<String>,

    /// Surcharge breakdown, when the gateway applies one.
    #[serde(default)]
    pub payment_surcharge: Option<serde_json::Value>,
}

/// Order fields projected onto the transaction record.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetails {
    /// Merchant order identifier.
    pub order_id: String,

    /// Merchant-supplied tags set at order creation.
    #[serde(default)]
    pub order_tags: Option<OrderTags>,
}

/// Merchant tags carried on the order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderTags {
    /// Fee plan the transaction settles under.
    #[serde(default, rename = "feePlanId")]
    pub fee_plan_id: Option<String>,

    /// Consumer the transaction belongs to, when known at order creation.
    #[serde(default, rename = "consumerId")]
    pub consumer_id: Option<String>,
}

impl WebhookPayload {
    /// Parses a payload from the raw body bytes.
    ///
    /// Must only be called after signature verification: a payload that does
    /// not verify is never inspected.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` when the bytes are not valid JSON
    /// or required fields are missing or mistyped.
    pub fn parse(raw_body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(raw_body).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    /// Returns the consumer id tag, treating an empty string as absent.
    pub fn consumer_id(&self) -> Option<&str> {
        self.data
            .order
            .order_tags
            .as_ref()
            .and_then(|tags| tags.consumer_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Returns the fee plan id tag, treating an empty string as absent.
    pub fn fee_plan_id(&self) -> Option<&str> {
        self.data
            .order
            .order_tags
            .as_ref()
            .and_then(|tags| tags.fee_plan_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Accepts a JSON string or number and yields its string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Number(n) => Ok(n.to_string()),
    }
}
