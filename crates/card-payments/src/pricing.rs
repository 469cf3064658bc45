//! Order Pricing
//!
//! The amount charged is always computed on the server. Never trust an
//! amount sent by the browser.

use serde::{Deserialize, Serialize};

/// Amount charged for every order, in cents
pub const PLACEHOLDER_ORDER_AMOUNT: i64 = 1400;

/// A line item sent by the browser
///
/// `id` references a product; prices are looked up server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
}

/// Compute the order total in the currency's minor unit.
///
/// Placeholder pricing: returns a fixed amount regardless of `items`.
// TODO: look each item id up in a product catalogue and sum the prices.
pub fn calculate_order_amount(items: &[OrderItem]) -> i64 {
    tracing::debug!(items = items.len(), "Using placeholder order amount");
    PLACEHOLDER_ORDER_AMOUNT
}
