//! Application State

use std::sync::Arc;

use card_payments::{PaymentProcessor, PaymentService, WebhookHandler, WebhookVerifier};

use crate::config::ServerConfig;

/// Shared application state
///
/// Read-only after startup; handlers keep no state between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,

    /// Create/confirm flow over the configured processor
    pub payments: PaymentService,

    pub verifier: Arc<WebhookVerifier>,

    pub webhooks: WebhookHandler,
}

impl AppState {
    pub fn new(config: ServerConfig, processor: Arc<dyn PaymentProcessor>) -> Self {
        let verifier = WebhookVerifier::new(config.webhook_secret.clone())
            .with_tolerance(config.webhook_tolerance_secs);

        Self {
            config: Arc::new(config),
            payments: PaymentService::new(processor),
            verifier: Arc::new(verifier),
            webhooks: WebhookHandler::new(),
        }
    }
}
