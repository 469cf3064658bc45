//! # card-payments
//!
//! Card payments with an optional saved card, on top of Stripe PaymentIntents.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────┐  /pay   ┌────────────────┐       ┌──────────────┐
//! │ Browser │────────▶│ PaymentService │──────▶│  Processor   │
//! │         │◀────────│  route_intent  │◀──────│   (Stripe)   │
//! └─────────┘         └────────────────┘       └──────┬───────┘
//!                                                     │ webhook
//!                     ┌────────────────┐              │
//!                     │ WebhookHandler │◀─────────────┘
//!                     └────────────────┘
//! ```
//!
//! The first `/pay` call creates and confirms an intent. If the card needs
//! 3D Secure the browser authenticates and calls `/pay` again with the
//! intent id, which only confirms. Saving the card attaches a fresh customer
//! and marks the intent for off-session reuse.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use card_payments::{PayCommand, PayRequest, PaymentService, StripeProcessor};
//!
//! let service = PaymentService::new(Arc::new(StripeProcessor::new("sk_test_xxx")));
//!
//! let command = PayCommand::try_from(request)?;
//! let response = service.pay(command).await;
//! // Send `response` back as JSON
//! ```

mod error;
mod intent;
mod pay;
mod pricing;
mod processor;
mod router;
mod webhook;

pub use error::{PaymentError, Result};
pub use intent::{
    ConfirmationMethod, CreateIntentParams, CustomerId, IntentStatus, PaymentIntent,
    SetupFutureUsage,
};
pub use pay::{CreateIntentRequest, PayCommand, PayRequest, PaymentService};
pub use pricing::{OrderItem, PLACEHOLDER_ORDER_AMOUNT, calculate_order_amount};
pub use processor::{MockProcessor, PaymentProcessor, ProcessorCall, StripeProcessor};
pub use router::{CARD_DENIED_MESSAGE, PayResponse, route_intent};
pub use webhook::{
    DEFAULT_TOLERANCE_SECS, IntentObject, LastPaymentError, PAYMENT_INTENT_PAYMENT_FAILED,
    PAYMENT_INTENT_SUCCEEDED, PAYMENT_METHOD_ATTACHED, PaymentMethodObject, SIGNATURE_HEADER,
    WebhookAction, WebhookEvent, WebhookHandler, WebhookVerifier, signature_header,
};
