//! HTTP Handlers

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use card_payments::{
    CreateIntentRequest, PayCommand, PayRequest, PayResponse, PaymentError, SIGNATURE_HEADER,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub processor: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeKeyResponse {
    pub public_key: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub public_key: String,
    pub client_secret: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        processor: state.payments.processor().name().to_string(),
    })
}

/// Publishable key for Stripe.js
pub async fn stripe_key(State(state): State<AppState>) -> Json<StripeKeyResponse> {
    Json(StripeKeyResponse {
        public_key: state.config.publishable_key.clone(),
    })
}

/// Create or confirm a payment.
///
/// Card declines are reported in the body with a 200 status; only requests
/// missing required fields get a 400.
pub async fn pay(
    State(state): State<AppState>,
    Json(payload): Json<PayRequest>,
) -> Result<Json<PayResponse>, ApiError> {
    let command = PayCommand::try_from(payload).map_err(|e| {
        tracing::warn!("Rejected pay request: {}", e);
        api_error(StatusCode::BAD_REQUEST, e.user_message(), "INVALID_REQUEST")
    })?;

    Ok(Json(state.payments.pay(command).await))
}

/// Create an unconfirmed intent for client-side confirmation
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(payload): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, ApiError> {
    let intent = state
        .payments
        .create_unconfirmed_intent(payload)
        .await
        .map_err(|e| match e {
            PaymentError::InvalidRequest(_) => {
                api_error(StatusCode::BAD_REQUEST, e.user_message(), "INVALID_REQUEST")
            }
            _ => {
                tracing::error!("Payment intent creation failed: {}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message(), "PROCESSOR_ERROR")
            }
        })?;

    Ok(Json(CreateIntentResponse {
        public_key: state.config.publishable_key.clone(),
        client_secret: intent.client_secret.unwrap_or_default(),
        id: intent.id,
    }))
}

/// Stripe webhook handler
///
/// Once the signature checks out the event is always acknowledged, so
/// Stripe does not retry because of local fulfilment problems.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Webhook request without signature header");
            api_error(StatusCode::BAD_REQUEST, "Invalid signature", "INVALID_SIGNATURE")
        })?;

    let event = state.verifier.construct_event(&body, signature).map_err(|e| {
        tracing::warn!("Webhook rejected: {}", e);
        match e {
            PaymentError::WebhookParse(_) => {
                api_error(StatusCode::BAD_REQUEST, e.user_message(), "INVALID_PAYLOAD")
            }
            _ => api_error(StatusCode::BAD_REQUEST, "Invalid signature", "INVALID_SIGNATURE"),
        }
    })?;

    let action = state.webhooks.handle(&event);
    tracing::debug!(event_type = event.event_type(), ?action, "Webhook processed");

    Ok(Json(WebhookAck { status: "success" }))
}
