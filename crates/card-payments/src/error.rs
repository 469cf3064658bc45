//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Error reported by the payment processor (declines, invalid requests)
    #[error("{0}")]
    Processor(String),

    /// Request is missing a field or carries a malformed id/currency
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Message safe to hand back to the browser.
    ///
    /// Processor errors carry the processor's own decline message, which is
    /// meant for the cardholder. Webhook failures never expose the reason.
    pub fn user_message(&self) -> String {
        match self {
            Self::Processor(msg) | Self::InvalidRequest(msg) => msg.clone(),
            Self::WebhookSignature(_) => "Invalid signature".into(),
            Self::WebhookParse(_) => "Invalid webhook payload".into(),
            Self::Config(_) => "Service configuration error.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_message_passes_through() {
        let err = PaymentError::Processor("Your card has insufficient funds.".into());
        assert_eq!(err.to_string(), "Your card has insufficient funds.");
        assert_eq!(err.user_message(), "Your card has insufficient funds.");
    }

    #[test]
    fn test_signature_reason_is_hidden() {
        let err = PaymentError::WebhookSignature("timestamp outside tolerance".into());
        assert_eq!(err.user_message(), "Invalid signature");
    }
}
