//! Webhook signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

use super::event::WebhookEvent;
use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum age of a signed payload, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Verifies `Stripe-Signature` headers against the endpoint secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Timestamp tolerance; zero or less disables the replay check
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Verify the signature and decode the event.
    ///
    /// The payload must be the raw request body, byte for byte.
    pub fn construct_event(&self, payload: &[u8], header: &str) -> Result<WebhookEvent> {
        self.verify(payload, header)?;
        WebhookEvent::from_payload(payload)
    }

    pub fn verify(&self, payload: &[u8], header: &str) -> Result<()> {
        self.verify_at(payload, header, chrono::Utc::now().timestamp())
    }

    /// Verify against an explicit clock
    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<()> {
        let parsed = SignatureHeader::parse(header)?;

        // The header timestamp is untrusted; compare without overflowing
        if self.tolerance_secs > 0
            && now.abs_diff(parsed.timestamp) > self.tolerance_secs.unsigned_abs()
        {
            return Err(PaymentError::WebhookSignature(
                "Timestamp outside the tolerance zone".into(),
            ));
        }

        let mac = signed_payload_mac(&self.secret, parsed.raw_timestamp, payload)?;
        let matched = parsed
            .signatures
            .iter()
            .any(|signature| mac.clone().verify_slice(signature).is_ok());

        if matched {
            Ok(())
        } else {
            Err(PaymentError::WebhookSignature(
                "No signatures found matching the expected signature for payload".into(),
            ))
        }
    }
}

/// Build a `Stripe-Signature` header value for `payload`.
///
/// Useful for local testing without the Stripe CLI.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> Result<String> {
    let timestamp = timestamp.to_string();
    let mac = signed_payload_mac(secret, &timestamp, payload)?;
    Ok(format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn signed_payload_mac(secret: &str, timestamp: &str, payload: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentError::Config("Invalid webhook secret".into()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Parsed `t=<unix>,v1=<hex>[,v1=<hex>...]` header
struct SignatureHeader<'a> {
    raw_timestamp: &'a str,
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

impl<'a> SignatureHeader<'a> {
    fn parse(header: &'a str) -> Result<Self> {
        let mut raw_timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => raw_timestamp = Some(value),
                // Other schemes (v0 test signatures) are ignored
                "v1" => {
                    if let Ok(bytes) = hex::decode(value) {
                        signatures.push(bytes);
                    }
                }
                _ => {}
            }
        }

        let raw_timestamp = raw_timestamp.ok_or_else(|| {
            PaymentError::WebhookSignature("Unable to extract timestamp from header".into())
        })?;
        let timestamp = raw_timestamp
            .parse()
            .map_err(|_| PaymentError::WebhookSignature("Invalid timestamp in header".into()))?;

        if signatures.is_empty() {
            return Err(PaymentError::WebhookSignature(
                "No v1 signatures found in header".into(),
            ));
        }

        Ok(Self {
            raw_timestamp,
            timestamp,
            signatures,
        })
    }
}
