//! Pay Flow
//!
//! Create-or-confirm logic behind the pay endpoint, plus the unconfirmed
//! intent creation used when the outcome is delivered by webhook.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{PaymentError, Result};
use crate::intent::{CreateIntentParams, IntentStatus, PaymentIntent};
use crate::pricing::{OrderItem, calculate_order_amount};
use crate::processor::PaymentProcessor;
use crate::router::{PayResponse, route_intent};

/// Pay request as sent by the browser
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    /// Only present on the second call, after the card was authenticated
    #[serde(default)]
    pub payment_intent_id: Option<String>,

    #[serde(default)]
    pub payment_method_id: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,

    #[serde(default)]
    pub is_saving_card: Option<bool>,
}

/// What a validated pay request asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayCommand {
    /// Confirm an intent that already exists (amount and currency are not needed)
    Confirm { payment_intent_id: String },

    /// Create and immediately confirm a new intent
    Create {
        currency: String,
        payment_method_id: String,
        items: Vec<OrderItem>,
        save_card: bool,
    },
}

impl TryFrom<PayRequest> for PayCommand {
    type Error = PaymentError;

    fn try_from(request: PayRequest) -> Result<Self> {
        if let Some(payment_intent_id) = request.payment_intent_id.filter(|id| !id.is_empty()) {
            return Ok(Self::Confirm { payment_intent_id });
        }

        let currency = required(request.currency, "currency")?;
        let payment_method_id = required(request.payment_method_id, "paymentMethodId")?;
        let items = request
            .items
            .ok_or_else(|| PaymentError::InvalidRequest("Missing field: items".into()))?;

        Ok(Self::Create {
            currency,
            payment_method_id,
            items,
            save_card: request.is_saving_card.unwrap_or(false),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PaymentError::InvalidRequest(format!("Missing field: {field}")))
}

/// Request for an unconfirmed intent (webhook flow)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateIntentRequest {
    pub currency: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Pay flow on top of a payment processor
#[derive(Clone)]
pub struct PaymentService {
    processor: Arc<dyn PaymentProcessor>,
}

impl PaymentService {
    pub fn new(processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &Arc<dyn PaymentProcessor> {
        &self.processor
    }

    /// Run a pay command and route the resulting intent.
    ///
    /// Processor failures (hard declines, invalid requests) come back as an
    /// error body rather than an `Err`.
    pub async fn pay(&self, command: PayCommand) -> PayResponse {
        match self.execute(command).await {
            Ok(intent) => {
                if intent.status == IntentStatus::Succeeded {
                    tracing::info!(
                        payment_intent = %intent.id,
                        amount = intent.amount,
                        "Payment received"
                    );
                }
                route_intent(&intent)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    processor = self.processor.name(),
                    "Payment attempt failed"
                );
                PayResponse::error(e.user_message())
            }
        }
    }

    async fn execute(&self, command: PayCommand) -> Result<PaymentIntent> {
        match command {
            PayCommand::Confirm { payment_intent_id } => {
                tracing::debug!(payment_intent = %payment_intent_id, "Confirming payment intent");
                self.processor.confirm_payment_intent(&payment_intent_id).await
            }
            PayCommand::Create {
                currency,
                payment_method_id,
                items,
                save_card,
            } => {
                let amount = calculate_order_amount(&items);
                let mut params =
                    CreateIntentParams::confirm_now(amount, currency, payment_method_id);

                if save_card {
                    let customer = self.processor.create_customer().await?;
                    tracing::info!(customer = %customer, "Saving card for off-session use");
                    params = params.save_for(customer);
                }

                let intent = self.processor.create_payment_intent(params).await?;
                tracing::info!(
                    payment_intent = %intent.id,
                    status = %intent.status,
                    amount,
                    "Created payment intent"
                );
                Ok(intent)
            }
        }
    }

    /// Create a customer and an unconfirmed intent for it.
    ///
    /// The browser confirms the intent; completion is only reported by webhook.
    pub async fn create_unconfirmed_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<PaymentIntent> {
        if request.currency.is_empty() {
            return Err(PaymentError::InvalidRequest("Missing field: currency".into()));
        }

        let amount = calculate_order_amount(&request.items);
        let customer = self.processor.create_customer().await?;
        let params =
            CreateIntentParams::unconfirmed(amount, request.currency).with_customer(customer);

        let intent = self.processor.create_payment_intent(params).await?;
        tracing::info!(
            payment_intent = %intent.id,
            amount,
            "Created payment intent for client-side confirmation"
        );
        Ok(intent)
    }
}
