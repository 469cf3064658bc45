//! Webhook Events
//!
//! Closed set of event types this server reacts to, plus a catch-all so new
//! event types never break the endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};
use crate::intent::{IntentStatus, SetupFutureUsage};

pub const PAYMENT_METHOD_ATTACHED: &str = "payment_method.attached";
pub const PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const PAYMENT_INTENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";

/// Payment intent as carried in an event. The client secret is never read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentObject {
    pub id: String,
    pub status: IntentStatus,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub setup_future_usage: Option<SetupFutureUsage>,
    #[serde(default)]
    pub last_payment_error: Option<LastPaymentError>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastPaymentError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payment method as carried in an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodObject {
    pub id: String,
    #[serde(rename = "type", default)]
    pub method_type: String,
    #[serde(default)]
    pub customer: Option<String>,
}

/// A verified webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    PaymentMethodAttached(PaymentMethodObject),
    PaymentIntentSucceeded(IntentObject),
    PaymentIntentPaymentFailed(IntentObject),
    /// Any other event type
    Unknown { event_type: String },
}

#[derive(Deserialize)]
struct Envelope {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: EnvelopeData,
}

#[derive(Deserialize)]
struct EnvelopeData {
    object: serde_json::Value,
}

impl WebhookEvent {
    /// Decode a raw event body.
    ///
    /// The object of a known event type must match its schema; unknown types
    /// are accepted without looking at the object.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::WebhookParse(e.to_string()))?;

        tracing::debug!(
            event_id = %envelope.id,
            event_type = %envelope.event_type,
            "Decoding webhook event"
        );

        let object = envelope.data.object;
        match envelope.event_type.as_str() {
            PAYMENT_METHOD_ATTACHED => Ok(Self::PaymentMethodAttached(decode(object)?)),
            PAYMENT_INTENT_SUCCEEDED => Ok(Self::PaymentIntentSucceeded(decode(object)?)),
            PAYMENT_INTENT_PAYMENT_FAILED => Ok(Self::PaymentIntentPaymentFailed(decode(object)?)),
            _ => Ok(Self::Unknown {
                event_type: envelope.event_type,
            }),
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::PaymentMethodAttached(_) => PAYMENT_METHOD_ATTACHED,
            Self::PaymentIntentSucceeded(_) => PAYMENT_INTENT_SUCCEEDED,
            Self::PaymentIntentPaymentFailed(_) => PAYMENT_INTENT_PAYMENT_FAILED,
            Self::Unknown { event_type } => event_type,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(object: serde_json::Value) -> Result<T> {
    serde_json::from_value(object).map_err(|e| PaymentError::WebhookParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(event_type: &str, object: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_123",
            "object": "event",
            "type": event_type,
            "data": { "object": object },
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_succeeded_intent() {
        let body = payload(
            PAYMENT_INTENT_SUCCEEDED,
            json!({
                "id": "pi_123",
                "object": "payment_intent",
                "status": "succeeded",
                "amount": 1400,
                "currency": "usd",
                "client_secret": "pi_123_secret_abc",
                "customer": "cus_1",
                "setup_future_usage": "off_session",
            }),
        );

        match WebhookEvent::from_payload(&body).unwrap() {
            WebhookEvent::PaymentIntentSucceeded(intent) => {
                assert_eq!(intent.id, "pi_123");
                assert_eq!(intent.amount, 1400);
                assert_eq!(intent.setup_future_usage, Some(SetupFutureUsage::OffSession));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_null_setup_future_usage() {
        let body = payload(
            PAYMENT_INTENT_SUCCEEDED,
            json!({ "id": "pi_1", "status": "succeeded", "setup_future_usage": null }),
        );
        let event = WebhookEvent::from_payload(&body).unwrap();
        assert!(matches!(
            event,
            WebhookEvent::PaymentIntentSucceeded(IntentObject { setup_future_usage: None, .. })
        ));
    }

    #[test]
    fn test_decode_payment_method_attached() {
        let body = payload(
            PAYMENT_METHOD_ATTACHED,
            json!({
                "id": "pm_1",
                "object": "payment_method",
                "type": "card",
                "customer": "cus_1",
            }),
        );
        let event = WebhookEvent::from_payload(&body).unwrap();
        assert_eq!(event.event_type(), PAYMENT_METHOD_ATTACHED);
    }

    #[test]
    fn test_unknown_type_is_not_validated() {
        let body = payload("charge.refunded", json!("not even an object"));
        assert_eq!(
            WebhookEvent::from_payload(&body).unwrap(),
            WebhookEvent::Unknown {
                event_type: "charge.refunded".into()
            }
        );
    }

    #[test]
    fn test_known_type_with_bad_object_fails() {
        let body = payload(PAYMENT_INTENT_PAYMENT_FAILED, json!({ "amount": 1400 }));
        let err = WebhookEvent::from_payload(&body).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookParse(_)));
    }

    #[test]
    fn test_not_json_fails() {
        assert!(WebhookEvent::from_payload(b"<html>").is_err());
    }
}
