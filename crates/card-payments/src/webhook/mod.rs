//! Stripe Webhook Handling
//!
//! Webhooks are the only durable record that a payment completed: the
//! browser may close before the synchronous pay call returns, and the event
//! may arrive before, after or instead of that response.

mod event;
mod signature;

pub use event::{
    IntentObject, LastPaymentError, PAYMENT_INTENT_PAYMENT_FAILED, PAYMENT_INTENT_SUCCEEDED,
    PAYMENT_METHOD_ATTACHED, PaymentMethodObject, WebhookEvent,
};
pub use signature::{DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER, WebhookVerifier, signature_header};

/// What the handler did with an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookAction {
    PaymentMethodAttached,
    PaymentReceived { card_saved: bool },
    PaymentFailed,
    Ignored,
}

/// Webhook handler
///
/// Fulfilment (shipping, receipts, linking cards to accounts) hooks in here.
#[derive(Clone, Debug, Default)]
pub struct WebhookHandler;

impl WebhookHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process a verified webhook event
    pub fn handle(&self, event: &WebhookEvent) -> WebhookAction {
        match event {
            WebhookEvent::PaymentMethodAttached(method) => {
                tracing::info!(
                    payment_method = %method.id,
                    customer = ?method.customer,
                    "PaymentMethod successfully attached to Customer"
                );
                WebhookAction::PaymentMethodAttached
            }

            WebhookEvent::PaymentIntentSucceeded(intent) => {
                let card_saved = intent.setup_future_usage.is_some();
                if !card_saved {
                    tracing::info!(
                        payment_intent = %intent.id,
                        "Customer did not want to save the card"
                    );
                }

                tracing::info!(
                    payment_intent = %intent.id,
                    amount = intent.amount,
                    currency = %intent.currency,
                    "Payment received"
                );
                WebhookAction::PaymentReceived { card_saved }
            }

            WebhookEvent::PaymentIntentPaymentFailed(intent) => {
                tracing::error!(
                    payment_intent = %intent.id,
                    reason = ?intent.last_payment_error.as_ref().and_then(|e| e.message.as_deref()),
                    "Payment failed"
                );
                WebhookAction::PaymentFailed
            }

            WebhookEvent::Unknown { event_type } => {
                tracing::debug!(event_type = %event_type, "Unhandled webhook event");
                WebhookAction::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentStatus, SetupFutureUsage};

    fn intent(setup_future_usage: Option<SetupFutureUsage>) -> IntentObject {
        IntentObject {
            id: "pi_123".into(),
            status: IntentStatus::Succeeded,
            amount: 1400,
            currency: "usd".into(),
            customer: None,
            setup_future_usage,
            last_payment_error: None,
        }
    }

    #[test]
    fn test_succeeded_reports_saved_card() {
        let handler = WebhookHandler::new();
        assert_eq!(
            handler.handle(&WebhookEvent::PaymentIntentSucceeded(intent(Some(
                SetupFutureUsage::OffSession
            )))),
            WebhookAction::PaymentReceived { card_saved: true }
        );
        assert_eq!(
            handler.handle(&WebhookEvent::PaymentIntentSucceeded(intent(None))),
            WebhookAction::PaymentReceived { card_saved: false }
        );
    }

    #[test]
    fn test_failed_and_unknown() {
        let handler = WebhookHandler::new();
        assert_eq!(
            handler.handle(&WebhookEvent::PaymentIntentPaymentFailed(intent(None))),
            WebhookAction::PaymentFailed
        );
        assert_eq!(
            handler.handle(&WebhookEvent::Unknown {
                event_type: "invoice.created".into()
            }),
            WebhookAction::Ignored
        );
    }
}
