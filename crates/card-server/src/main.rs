//! Save-card-after-payment HTTP Server
//!
//! Axum server that collects a card payment through Stripe, optionally keeps
//! the card for off-session charges, and listens for Stripe webhooks.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use card_payments::StripeProcessor;

use crate::config::ServerConfig;
use crate::handlers::{create_payment_intent, health_check, pay, stripe_key, stripe_webhook};
use crate::state::AppState;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health_check))
        .route("/stripe-key", get(stripe_key))
        // Payments
        .route("/pay", post(pay))
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/webhook", post(stripe_webhook))
        // Static files (checkout page)
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().inspect_err(|e| {
        tracing::error!("{}", e);
        tracing::error!(
            "  Set STRIPE_PUBLISHABLE_KEY, STRIPE_SECRET_KEY and STRIPE_WEBHOOK_SECRET in .env"
        );
    })?;
    tracing::debug!(?config, "Loaded configuration");

    let processor = Arc::new(StripeProcessor::new(&config.secret_key));
    let addr = config.bind_addr.clone();
    let static_dir = config.static_dir.clone();

    let app = build_router(AppState::new(config, processor));

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Serving static files from {}", static_dir.display());
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /stripe-key            - Publishable key");
    tracing::info!("  POST /pay                   - Create or confirm a payment");
    tracing::info!("  POST /create-payment-intent - Create intent for client-side confirmation");
    tracing::info!("  POST /webhook               - Stripe webhook");

    axum::serve(listener, app).await?;

    Ok(())
}
