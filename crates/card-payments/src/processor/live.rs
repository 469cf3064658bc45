//! Stripe PaymentIntents Integration
//!
//! Live processor backed by the Stripe API.

use async_trait::async_trait;
use stripe::{
    Client, CreateCustomer, CreatePaymentIntent, Currency, Customer,
    PaymentIntent as StripePaymentIntent, PaymentIntentConfirmParams,
    PaymentIntentConfirmationMethod, PaymentIntentId, PaymentIntentSetupFutureUsage,
    PaymentMethodId, StripeError,
};

use super::PaymentProcessor;
use crate::error::{PaymentError, Result};
use crate::intent::{
    ConfirmationMethod, CreateIntentParams, CustomerId, IntentStatus, PaymentIntent,
    SetupFutureUsage,
};

/// Stripe client wrapper
pub struct StripeProcessor {
    client: Client,
}

impl StripeProcessor {
    /// Create a new Stripe processor from a secret key
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    async fn create_customer(&self) -> Result<CustomerId> {
        let customer = Customer::create(&self.client, CreateCustomer::new())
            .await
            .map_err(processor_error)?;

        tracing::debug!(customer = %customer.id, "Created Stripe customer");
        Ok(CustomerId::new(customer.id.to_string()))
    }

    async fn create_payment_intent(&self, request: CreateIntentParams) -> Result<PaymentIntent> {
        let currency = request
            .currency
            .to_lowercase()
            .parse::<Currency>()
            .map_err(|_| {
                PaymentError::InvalidRequest(format!("Unsupported currency: {}", request.currency))
            })?;

        let mut params = CreatePaymentIntent::new(request.amount, currency);
        params.confirm = Some(request.confirm);
        params.confirmation_method = Some(match request.confirmation_method {
            ConfirmationMethod::Automatic => PaymentIntentConfirmationMethod::Automatic,
            ConfirmationMethod::Manual => PaymentIntentConfirmationMethod::Manual,
        });

        if let Some(ref payment_method) = request.payment_method {
            params.payment_method = Some(payment_method.parse::<PaymentMethodId>().map_err(|_| {
                PaymentError::InvalidRequest(format!("Invalid payment method id: {payment_method}"))
            })?);
        }

        if let Some(ref customer) = request.customer {
            params.customer = Some(customer.as_str().parse().map_err(|_| {
                PaymentError::InvalidRequest(format!("Invalid customer id: {customer}"))
            })?);
        }

        params.setup_future_usage = request.setup_future_usage.map(|usage| match usage {
            SetupFutureUsage::OffSession => PaymentIntentSetupFutureUsage::OffSession,
            SetupFutureUsage::OnSession => PaymentIntentSetupFutureUsage::OnSession,
        });

        let intent = StripePaymentIntent::create(&self.client, params)
            .await
            .map_err(processor_error)?;

        Ok(from_stripe(intent))
    }

    async fn confirm_payment_intent(&self, payment_intent_id: &str) -> Result<PaymentIntent> {
        payment_intent_id.parse::<PaymentIntentId>().map_err(|_| {
            PaymentError::InvalidRequest(format!("Invalid payment intent id: {payment_intent_id}"))
        })?;

        let intent = StripePaymentIntent::confirm(
            &self.client,
            payment_intent_id,
            PaymentIntentConfirmParams::default(),
        )
        .await
        .map_err(processor_error)?;

        Ok(from_stripe(intent))
    }

    fn name(&self) -> &str {
        "stripe"
    }
}

/// Keep Stripe's own message: for declines it is written for the cardholder.
fn processor_error(err: StripeError) -> PaymentError {
    match err {
        StripeError::Stripe(request) => {
            tracing::warn!(
                http_status = request.http_status,
                decline_code = ?request.decline_code,
                "Stripe rejected request"
            );
            PaymentError::Processor(
                request
                    .message
                    .unwrap_or_else(|| "Payment processing failed. Please try again.".into()),
            )
        }
        other => {
            tracing::error!(error = %other, "Stripe request failed");
            PaymentError::Processor(other.to_string())
        }
    }
}

fn from_stripe(intent: StripePaymentIntent) -> PaymentIntent {
    PaymentIntent {
        id: intent.id.to_string(),
        status: IntentStatus::parse(intent.status.as_str()),
        client_secret: intent.client_secret,
        customer: intent.customer.map(|c| CustomerId::new(c.id().to_string())),
        setup_future_usage: intent
            .setup_future_usage
            .and_then(|usage| SetupFutureUsage::parse(usage.as_str())),
        amount: intent.amount,
        currency: intent.currency.to_string(),
    }
}
