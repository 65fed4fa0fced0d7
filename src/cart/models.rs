//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain.

use super::{engine::CartEngine, pricing::Coupon};
use crate::catalog::models::Product;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Number;
use std::sync::Arc;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Returns the default quantity (1) for cart additions
fn default_quantity() -> u32 {
    1
}

/// A line in the cart. `0 < quantity <= product.stock` always holds.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartItem {
    pub product: Arc<Product>,
    pub quantity: u32,
}

/// The only cart data written to the key-value store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCartEntry {
    pub product_id: String,

    /// Stored as written; clamped to stock when the cart is restored
    #[serde(deserialize_with = "stored_quantity")]
    pub quantity: u64,
}

impl From<&CartItem> for PersistedCartEntry {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            quantity: u64::from(item.quantity),
        }
    }
}

/// Accepts any non-negative JSON number. Fractions are truncated and values
/// beyond `u64::MAX` saturate.
fn stored_quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|q| q.is_finite() && *q >= 0.0)
                .map(|q| q as u64)
        })
        .ok_or_else(|| de::Error::custom(format!("invalid quantity {}", number)))
}

/// Order totals derived from the cart and the applied coupon
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

// =============================================================================
// API Inputs and Responses
// =============================================================================

/// Input carrying only the session identifier
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub session_id: Option<String>,
}

/// Input for adding a product to the cart
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    pub session_id: Option<String>,
    pub product_id: String,

    /// Quantity to add (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Input for setting a line's quantity; zero or negative removes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityInput {
    pub session_id: Option<String>,
    pub product_id: String,
    pub quantity: i64,
}

/// Input for removing a product from the cart
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemInput {
    pub session_id: Option<String>,
    pub product_id: String,
}

/// Input for applying a coupon code
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponInput {
    pub session_id: Option<String>,

    #[serde(default)]
    pub code: String,
}

/// Snapshot of a session's cart returned by every cart endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub session_id: String,
    pub items: Vec<CartItem>,

    /// Sum of quantities across all lines
    pub total_quantity: u32,
    pub applied_coupon: Option<Coupon>,
    pub totals: CartTotals,

    /// One-line summary, e.g. "2x Apple, 1x Banana"
    pub summary: String,
}

impl CartView {
    pub fn new(session_id: String, cart: &CartEngine) -> Self {
        Self {
            session_id,
            items: cart.items().to_vec(),
            total_quantity: cart.total_quantity(),
            applied_coupon: cart.applied_coupon().copied(),
            totals: cart.totals(),
            summary: cart.item_summary(),
        }
    }
}

/// Outcome of a coupon application together with the resulting cart
#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub success: bool,
    pub message: String,
    pub cart: CartView,
}
