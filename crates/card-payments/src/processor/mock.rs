//! Mock Payment Processor
//!
//! For testing and demo purposes. Returns intents with a scripted status
//! and records every call in order.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use super::PaymentProcessor;
use crate::error::{PaymentError, Result};
use crate::intent::{CreateIntentParams, CustomerId, IntentStatus, PaymentIntent};

/// A call made against the mock
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessorCall {
    CreateCustomer,
    CreatePaymentIntent(CreateIntentParams),
    ConfirmPaymentIntent(String),
}

/// Mock processor with scripted responses
pub struct MockProcessor {
    status: IntentStatus,
    client_secret: String,
    /// Every call fails with this message when set (e.g. a hard decline)
    failure: Option<String>,
    calls: Mutex<Vec<ProcessorCall>>,
    counter: AtomicU64,
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProcessor {
    pub fn new() -> Self {
        Self {
            status: IntentStatus::Succeeded,
            client_secret: "cs_test_abc".into(),
            failure: None,
            calls: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Intents come back with this status
    pub fn with_status(mut self, status: IntentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = client_secret.into();
        self
    }

    /// Every call fails with a processor error carrying `message`
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Calls made so far, oldest first
    pub async fn calls(&self) -> Vec<ProcessorCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: ProcessorCall) -> Result<()> {
        self.calls.lock().await.push(call);
        match self.failure {
            Some(ref message) => Err(PaymentError::Processor(message.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}_mock_{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_customer(&self) -> Result<CustomerId> {
        self.record(ProcessorCall::CreateCustomer).await?;
        Ok(CustomerId::new(self.next_id("cus")))
    }

    async fn create_payment_intent(&self, params: CreateIntentParams) -> Result<PaymentIntent> {
        self.record(ProcessorCall::CreatePaymentIntent(params.clone())).await?;
        Ok(PaymentIntent {
            id: self.next_id("pi"),
            status: self.status.clone(),
            client_secret: Some(self.client_secret.clone()),
            customer: params.customer,
            setup_future_usage: params.setup_future_usage,
            amount: params.amount,
            currency: params.currency,
        })
    }

    async fn confirm_payment_intent(&self, payment_intent_id: &str) -> Result<PaymentIntent> {
        self.record(ProcessorCall::ConfirmPaymentIntent(payment_intent_id.to_string()))
            .await?;
        Ok(PaymentIntent {
            id: payment_intent_id.to_string(),
            status: self.status.clone(),
            client_secret: Some(self.client_secret.clone()),
            customer: None,
            setup_future_usage: None,
            amount: crate::pricing::PLACEHOLDER_ORDER_AMOUNT,
            currency: "usd".into(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
