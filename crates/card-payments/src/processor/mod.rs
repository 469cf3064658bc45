//! Payment Processor Integration
//!
//! Abstractions over the hosted payment API and its implementations.

mod live;
mod mock;

pub use self::live::StripeProcessor;
pub use self::mock::{MockProcessor, ProcessorCall};

use async_trait::async_trait;

use crate::error::Result;
use crate::intent::{CreateIntentParams, CustomerId, PaymentIntent};

/// Payment processor trait (Strategy pattern)
///
/// Each call is one independent network round-trip. Failures surface
/// immediately; nothing is retried.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create an empty customer to hold a saved payment method
    async fn create_customer(&self) -> Result<CustomerId>;

    /// Create a payment intent
    async fn create_payment_intent(&self, params: CreateIntentParams) -> Result<PaymentIntent>;

    /// Confirm an existing payment intent (e.g. after 3D Secure)
    async fn confirm_payment_intent(&self, payment_intent_id: &str) -> Result<PaymentIntent>;

    /// Processor name
    fn name(&self) -> &str;
}
