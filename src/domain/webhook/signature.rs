//! Gateway webhook signature verification.
//!
//! The gateway signs each delivery with
//! `base64(HMAC-SHA256(raw_body || timestamp, app_secret))` and sends the
//! result in the `x-webhook-signature` header. Verification is a pure
//! function over (secret, raw bytes, timestamp header): no freshness window
//! is applied here, and the raw bytes must be exactly what arrived on the
//! wire. Any re-serialization of the body would change the byte sequence and
//! break verification.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

/// Verifier for gateway webhook signatures.
pub struct GatewayWebhookVerifier {
    /// The application secret shared with the gateway.
    secret: SecretString,
}

impl GatewayWebhookVerifier {
    /// Creates a new verifier with the given application secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies a webhook signature against the raw body and timestamp header.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSignature` when the header is not valid
    /// base64 or the computed MAC does not match.
    pub fn verify(
        &self,
        signature_header: &str,
        raw_body: &[u8],
        timestamp_header: &str,
    ) -> Result<(), WebhookError> {
        let claimed = BASE64
            .decode(signature_header.trim())
            .map_err(|_| WebhookError::InvalidSignature)?;

        let expected = self.compute_mac(raw_body, timestamp_header);

        if !constant_time_compare(&expected, &claimed) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Computes the raw HMAC-SHA256 over `raw_body || timestamp`.
    fn compute_mac(&self, raw_body: &[u8], timestamp: &str) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(raw_body);
        mac.update(timestamp.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the expected signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
