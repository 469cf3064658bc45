//! Intent Status Router
//!
//! Maps a payment intent's status to what the browser should do next.

use serde::Serialize;

use crate::intent::{IntentStatus, PaymentIntent};

/// Shown when the card was refused and a new one is needed
pub const CARD_DENIED_MESSAGE: &str = "Your card was denied, please provide a new payment method";

/// Body returned to the browser after a pay call
///
/// Serialised untagged so each variant carries exactly its own fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PayResponse {
    /// Card needs additional authentication (3D Secure)
    RequiresAction {
        #[serde(rename = "requiresAction")]
        requires_action: bool,
        #[serde(rename = "paymentIntentId")]
        payment_intent_id: String,
        #[serde(rename = "clientSecret")]
        client_secret: String,
    },

    /// Payment complete
    Succeeded {
        #[serde(rename = "clientSecret")]
        client_secret: String,
    },

    /// Business failure, encoded in the body rather than the status code
    Error { error: String },

    /// Nothing for the browser to do
    Empty {},
}

impl PayResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Route an intent to the browser-facing response for its status.
///
/// Pure: no logging, no processor calls.
pub fn route_intent(intent: &PaymentIntent) -> PayResponse {
    let client_secret = || intent.client_secret.clone().unwrap_or_default();

    match intent.status {
        IntentStatus::RequiresAction | IntentStatus::RequiresSourceAction => {
            PayResponse::RequiresAction {
                requires_action: true,
                payment_intent_id: intent.id.clone(),
                client_secret: client_secret(),
            }
        }
        IntentStatus::RequiresPaymentMethod | IntentStatus::RequiresSource => {
            PayResponse::error(CARD_DENIED_MESSAGE)
        }
        IntentStatus::Succeeded => PayResponse::Succeeded {
            client_secret: client_secret(),
        },
        IntentStatus::RequiresConfirmation
        | IntentStatus::Processing
        | IntentStatus::RequiresCapture
        | IntentStatus::Canceled
        | IntentStatus::Unknown => PayResponse::Empty {},
    }
}
