//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for session handling and formatting.

use super::models::CartItem;
use uuid::Uuid;

/// Returns the provided `session_id` or creates a new UUID string when
/// `None` or blank.
///
/// This guarantees that every cart operation works with a non-empty identifier.
pub fn get_or_create_session_id(session_id: Option<String>) -> String {
    session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

/// Storage key for a session's cart, scoped under the shared cart key.
pub fn session_storage_key(base_key: &str, session_id: &str) -> String {
    format!("{}:{}", base_key, session_id)
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Aurora Noise-Cancelling Headphones, 1x Vertex Mechanical Keyboard"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.product.name))
        .collect::<Vec<_>>()
        .join(", ")
}
