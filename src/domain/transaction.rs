//! Transaction record assembly.
//!
//! A `NewTransaction` is the flat projection of a verified webhook payload
//! plus the delivery headers. It is assembled exactly once per accepted
//! webhook and is immutable after the store accepts it; this service has no
//! update or delete path.

use chrono::{DateTime, TimeZone, Utc};

use super::webhook::{WebhookError, WebhookPayload};

/// Delivery metadata taken from the webhook request headers.
#[derive(Debug, Clone)]
pub struct DeliveryMeta {
    /// The signature header, stored verbatim for audit.
    pub signature: String,

    /// Delivery instant, derived from the epoch-millisecond timestamp header.
    pub received_at: DateTime<Utc>,

    /// Gateway redelivery attempt counter, when sent.
    pub attempt: Option<i32>,

    /// Webhook schema version, when sent.
    pub version: Option<String>,

    /// Caller-supplied idempotency key, when sent.
    pub idempotency_key: Option<String>,
}

/// A transaction record ready for insertion.
///
/// `order_id` and `fee_plan_id` reference rows owned by an external system;
/// a dangling reference is a hard failure at insert time, not here.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub external_payment_id: String,
    pub amount: f64,
    pub status: String,
    pub payment_time: Option<DateTime<Utc>>,
    pub currency: Option<String>,
    pub message: Option<String>,
    pub bank_reference: Option<String>,
    pub payment_method: Option<serde_json::Value>,
    pub payment_group: Option<String>,
    pub surcharge: Option<serde_json::Value>,
    pub gateway_details: Option<serde_json::Value>,
    /// Ordered offer sequence. Defaults to empty, never null.
    pub offers: Vec<serde_json::Value>,
    pub error_details: Option<serde_json::Value>,
    pub terminal_details: Option<serde_json::Value>,
    /// The full webhook body, stored verbatim for audit.
    pub raw_payload: serde_json::Value,
    pub attempt: Option<i32>,
    pub signature: String,
    pub received_at: DateTime<Utc>,
    pub version: Option<String>,
    pub idempotency_key: Option<String>,
    pub order_id: String,
    pub fee_plan_id: String,
    pub consumer_id: Option<String>,
}

impl NewTransaction {
    /// Projects a verified payload and its delivery metadata onto a record.
    ///
    /// The consumer relation is set only when `order_tags.consumerId` is a
    /// non-empty string; `payment_offers` collapses to an empty sequence when
    /// absent or null.
    ///
    /// # Errors
    ///
    /// - `MissingField` when `order_tags.feePlanId` is absent or empty.
    /// - `ParseError` when `payment_offers` is present but not an array.
    pub fn from_webhook(
        payload: &WebhookPayload,
        raw_body: &[u8],
        meta: DeliveryMeta,
    ) -> Result<Self, WebhookError> {
        let fee_plan_id = payload
            .fee_plan_id()
            .ok_or(WebhookError::MissingField("order_tags.feePlanId"))?
            .to_string();

        let consumer_id = payload.consumer_id().map(str::to_string);

        let offers = match payload.data.payment_offers.clone() {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items,
            Some(_) => {
                return Err(WebhookError::ParseError(
                    "payment_offers must be an array".to_string(),
                ))
            }
        };

        // The payload already parsed, so the raw body is known-valid JSON.
        let raw_payload = serde_json::from_slice(raw_body)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let payment = &payload.data.payment;

        Ok(Self {
            external_payment_id: payment.cf_payment_id.clone(),
            amount: payment.payment_amount,
            status: payment.payment_status.clone(),
            payment_time: payment.payment_time,
            currency: payment.payment_currency.clone(),
            message: payment.payment_message.clone(),
            bank_reference: payment.bank_reference.clone(),
            payment_method: payment.payment_method.clone(),
            payment_group: payment.payment_group.clone(),
            surcharge: payment.payment_surcharge.clone(),
            gateway_details: payload.data.payment_gateway_details.clone(),
            offers,
            error_details: payload.data.error_details.clone(),
            terminal_details: payload.data.terminal_details.clone(),
            raw_payload,
            attempt: meta.attempt,
            signature: meta.signature,
            received_at: meta.received_at,
            version: meta.version,
            idempotency_key: meta.idempotency_key,
            order_id: payload.data.order.order_id.clone(),
            fee_plan_id,
            consumer_id,
        })
    }
}

/// Parses the `x-webhook-timestamp` header into a delivery instant.
///
/// The header carries epoch milliseconds as a decimal string.
///
/// # Errors
///
/// Returns `WebhookError::InvalidTimestamp` when the value is not a valid
/// epoch-millisecond integer.
pub fn parse_webhook_timestamp(header: &str) -> Result<DateTime<Utc>, WebhookError> {
    let millis: i64 = header
        .trim()
        .parse()
        .map_err(|_| WebhookError::InvalidTimestamp(header.to_string()))?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| WebhookError::InvalidTimestamp(header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> DeliveryMeta {
        DeliveryMeta {
            signature: "sig123".to_string(),
            received_at: parse_webhook_timestamp("1700000000000").unwrap(),
            attempt: Some(1),
            version: Some("2023-08-01".to_string()),
            idempotency_key: Some("idem-1".to_string()),
        }
    }

    fn parse(raw: &[u8]) -> WebhookPayload {
        WebhookPayload::parse(raw).unwrap()
    }

    const EXAMPLE: &[u8] = br#"{"data":{"payment":{"cf_payment_id":"P1","payment_amount":100,"payment_status":"SUCCESS"},"order":{"order_id":"O1","order_tags":{"feePlanId":"F1","consumerId":""}}}}"#;

    #[test]
    fn projects_core_fields() {
        let payload = parse(EXAMPLE);
        let record = NewTransaction::from_webhook(&payload, EXAMPLE, meta()).unwrap();

        assert_eq!(record.external_payment_id, "P1");
        assert_eq!(record.amount, 100.0);
        assert_eq!(record.status, "SUCCESS");
        assert_eq!(record.order_id, "O1");
        assert_eq!(record.fee_plan_id, "F1");
        assert_eq!(record.signature, "sig123");
        assert_eq!(record.attempt, Some(1));
        assert_eq!(record.idempotency_key.as_deref(), Some("idem-1"));
    }

    #[test]
    fn empty_consumer_tag_omits_relation() {
        let payload = parse(EXAMPLE);
        let record = NewTransaction::from_webhook(&payload, EXAMPLE, meta()).unwrap();

        assert_eq!(record.consumer_id, None);
    }

    #[test]
    fn non_empty_consumer_tag_sets_relation() {
        let raw = br#"{"data":{"payment":{"cf_payment_id":"P1","payment_amount":100,"payment_status":"SUCCESS"},"order":{"order_id":"O1","order_tags":{"feePlanId":"F1","consumerId":"C1"}}}}"#;
        let payload = parse(raw);
        let record = NewTransaction::from_webhook(&payload, raw, meta()).unwrap();

        assert_eq!(record.consumer_id.as_deref(), Some("C1"));
    }

    #[test]
    fn missing_fee_plan_is_rejected() {
        let raw = br#"{"data":{"payment":{"cf_payment_id":"P1","payment_amount":100,"payment_status":"SUCCESS"},"order":{"order_id":"O1"}}}"#;
        let payload = parse(raw);
        let result = NewTransaction::from_webhook(&payload, raw, meta());

        assert!(matches!(
            result,
            Err(WebhookError::MissingField("order_tags.feePlanId"))
        ));
    }

    #[test]
    fn absent_offers_default_to_empty() {
        let payload = parse(EXAMPLE);
        let record = NewTransaction::from_webhook(&payload, EXAMPLE, meta()).unwrap();

        assert!(record.offers.is_empty());
    }

    #[test]
    fn null_offers_default_to_empty() {
        let raw = br#"{"data":{"payment":{"cf_payment_id":"P1","payment_amount":100,"payment_status":"SUCCESS"},"order":{"order_id":"O1","order_tags":{"feePlanId":"F1"}},"payment_offers":null}}"#;
        let payload = parse(raw);
        let record = NewTransaction::from_webhook(&payload, raw, meta()).unwrap();

        assert!(record.offers.is_empty());
    }

    #[test]
    fn offers_preserve_order() {
        let raw = br#"{"data":{"payment":{"cf_payment_id":"P1","payment_amount":100,"payment_status":"SUCCESS"},"order":{"order_id":"O1","order_tags":{"feePlanId":"F1"}},"payment_offers":[{"offer_id":"A"},{"offer_id":"B"}]}}"#;
        let payload = parse(raw);
        let record = NewTransaction::from_webhook(&payload, raw, meta()).unwrap();

        assert_eq!(record.offers.len(), 2);
        assert_eq!(record.offers[0]["offer_id"], "A");
        assert_eq!(record.offers[1]["offer_id"], "B");
    }

    #[test]
    fn scalar_offers_are_rejected() {
        let raw = br#"{"data":{"payment":{"cf_payment_id":"P1","payment_amount":100,"payment_status":"SUCCESS"},"order":{"order_id":"O1","order_tags":{"feePlanId":"F1"}},"payment_offers":"none"}}"#;
        let payload = parse(raw);
        let result = NewTransaction::from_webhook(&payload, raw, meta());

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn raw_payload_is_stored_verbatim() {
        let payload = parse(EXAMPLE);
        let record = NewTransaction::from_webhook(&payload, EXAMPLE, meta()).unwrap();

        assert_eq!(
            record.raw_payload["data"]["payment"]["cf_payment_id"],
            "P1"
        );
    }

    #[test]
    fn parse_timestamp_accepts_epoch_millis() {
        let ts = parse_webhook_timestamp("1700000000000").unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn parse_timestamp_rejects_non_numeric() {
        let result = parse_webhook_timestamp("yesterday");
        assert!(matches!(result, Err(WebhookError::InvalidTimestamp(_))));
    }

    #[test]
    fn parse_timestamp_rejects_empty() {
        let result = parse_webhook_timestamp("");
        assert!(matches!(result, Err(WebhookError::InvalidTimestamp(_))));
    }
}
