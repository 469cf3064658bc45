//! Payment Intent Model
//!
//! Processor-owned objects as the server sees them. Nothing here is stored;
//! values live for a single request/response cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a payment intent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    /// Legacy alias of `RequiresPaymentMethod` (Sources API)
    RequiresSource,
    /// Legacy alias of `RequiresAction` (Sources API)
    RequiresSourceAction,
    /// A status this server does not know about
    #[serde(other)]
    Unknown,
}

impl IntentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::RequiresConfirmation => "requires_confirmation",
            Self::RequiresAction => "requires_action",
            Self::Processing => "processing",
            Self::RequiresCapture => "requires_capture",
            Self::Canceled => "canceled",
            Self::Succeeded => "succeeded",
            Self::RequiresSource => "requires_source",
            Self::RequiresSourceAction => "requires_source_action",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the processor's status string. Unrecognised values map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "requires_confirmation" => Self::RequiresConfirmation,
            "requires_action" => Self::RequiresAction,
            "processing" => Self::Processing,
            "requires_capture" => Self::RequiresCapture,
            "canceled" => Self::Canceled,
            "succeeded" => Self::Succeeded,
            "requires_source" => Self::RequiresSource,
            "requires_source_action" => Self::RequiresSourceAction,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a saved payment method will be used later
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupFutureUsage {
    /// Charge the card later without the cardholder present
    OffSession,
    OnSession,
}

impl SetupFutureUsage {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OffSession => "off_session",
            Self::OnSession => "on_session",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off_session" => Some(Self::OffSession),
            "on_session" => Some(Self::OnSession),
            _ => None,
        }
    }
}

/// Processor-side customer id, used to keep a card across sessions
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A payment intent as returned by the processor
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub status: IntentStatus,
    /// Only ever returned to the browser that created the intent
    pub client_secret: Option<String>,
    pub customer: Option<CustomerId>,
    pub setup_future_usage: Option<SetupFutureUsage>,
    /// Amount in the currency's minor unit
    pub amount: i64,
    pub currency: String,
}

impl fmt::Debug for PaymentIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentIntent")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("customer", &self.customer)
            .field("setup_future_usage", &self.setup_future_usage)
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .finish()
    }
}

/// How the intent gets confirmed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationMethod {
    /// Confirmed client-side with the publishable key
    Automatic,
    /// Server must call confirm after any required authentication
    Manual,
}

/// Parameters for creating a payment intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateIntentParams {
    pub amount: i64,
    pub currency: String,
    pub payment_method: Option<String>,
    pub confirmation_method: ConfirmationMethod,
    pub confirm: bool,
    pub customer: Option<CustomerId>,
    pub setup_future_usage: Option<SetupFutureUsage>,
}

impl CreateIntentParams {
    /// Manually-confirmed intent, confirmed immediately with the given card
    pub fn confirm_now(
        amount: i64,
        currency: impl Into<String>,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency: currency.into(),
            payment_method: Some(payment_method.into()),
            confirmation_method: ConfirmationMethod::Manual,
            confirm: true,
            customer: None,
            setup_future_usage: None,
        }
    }

    /// Unconfirmed intent; the browser confirms it and the outcome arrives by webhook
    pub fn unconfirmed(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            payment_method: None,
            confirmation_method: ConfirmationMethod::Automatic,
            confirm: false,
            customer: None,
            setup_future_usage: None,
        }
    }

    /// Attach a customer and keep the card for later off-session charges
    pub fn save_for(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self.setup_future_usage = Some(SetupFutureUsage::OffSession);
        self
    }

    pub fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(IntentStatus::parse("requires_action"), IntentStatus::RequiresAction);
        assert_eq!(IntentStatus::parse("requires_source"), IntentStatus::RequiresSource);
        assert_eq!(IntentStatus::parse("something_new"), IntentStatus::Unknown);
    }

    #[test]
    fn test_status_deserializes_unknown() {
        let status: IntentStatus = serde_json::from_str("\"requires_source_action\"").unwrap();
        assert_eq!(status, IntentStatus::RequiresSourceAction);

        let status: IntentStatus = serde_json::from_str("\"brand_new_state\"").unwrap();
        assert_eq!(status, IntentStatus::Unknown);
    }

    #[test]
    fn test_debug_redacts_client_secret() {
        let intent = PaymentIntent {
            id: "pi_123".into(),
            status: IntentStatus::Succeeded,
            client_secret: Some("pi_123_secret_abc".into()),
            customer: None,
            setup_future_usage: None,
            amount: 1400,
            currency: "usd".into(),
        };
        let debug = format!("{intent:?}");
        assert!(!debug.contains("pi_123_secret_abc"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_save_for_sets_off_session() {
        let params = CreateIntentParams::confirm_now(1400, "usd", "pm_123")
            .save_for(CustomerId::new("cus_1"));
        assert_eq!(params.customer, Some(CustomerId::new("cus_1")));
        assert_eq!(params.setup_future_usage, Some(SetupFutureUsage::OffSession));
        assert!(params.confirm);
        assert_eq!(params.confirmation_method, ConfirmationMethod::Manual);
    }
}
