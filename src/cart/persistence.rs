//! Cart persistence and reconciliation against the live catalog.
//!
//! Reading never fails: anything unreadable is treated as an empty cart.

use super::{
    models::{CartItem, PersistedCartEntry},
    store::KeyValueStore,
};
use crate::catalog::models::Catalog;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Key under which the cart blob is stored
pub const CART_STORAGE_KEY: &str = "lumina-market-cart-v1";

/// Result of reading the stored cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistedCart {
    Entries(Vec<PersistedCartEntry>),
    Empty,
}

/// Parses a stored cart blob.
///
/// Malformed JSON or a non-array payload yields [`PersistedCart::Empty`].
/// Individual entries that are not `{productId: string, quantity: positive
/// integer}` are skipped.
pub fn parse_persisted(raw: &str) -> PersistedCart {
    if raw.trim().is_empty() {
        return PersistedCart::Empty;
    }

    let values = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(values)) => values,
        Ok(other) => {
            warn!("Stored cart is not an array ({}), resetting cart", json_kind(&other));
            return PersistedCart::Empty;
        }
        Err(e) => {
            warn!("Unable to read stored cart, resetting cart: {}", e);
            return PersistedCart::Empty;
        }
    };

    let total = values.len();
    let entries: Vec<PersistedCartEntry> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<PersistedCartEntry>(value).ok())
        .filter(|entry| entry.quantity > 0)
        .collect();

    if entries.len() < total {
        debug!("Skipped {} malformed stored cart entries", total - entries.len());
    }

    PersistedCart::Entries(entries)
}

/// Restores the cart stored under `key` against `catalog`.
///
/// When the reconciled lines no longer match the stored blob (dropped or
/// clamped entries, corrupt JSON), the blob is rewritten right away. A
/// missing key is left missing.
pub fn restore(catalog: &Catalog, store: &dyn KeyValueStore, key: &str) -> Vec<CartItem> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };

    let items = reconcile(catalog, parse_persisted(&raw));
    if serialize_entries(&items).as_deref() != Some(raw.as_str()) {
        debug!("Rewriting stale stored cart {}", key);
        write_persisted(store, key, &items);
    }

    items
}

/// Hydrates stored entries into cart lines.
///
/// Unknown products are dropped, quantities are clamped to current stock and
/// lines clamped to zero are dropped. A repeated product id keeps its first
/// entry.
pub fn reconcile(catalog: &Catalog, persisted: PersistedCart) -> Vec<CartItem> {
    let entries = match persisted {
        PersistedCart::Entries(entries) => entries,
        PersistedCart::Empty => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(product) = catalog.get(&entry.product_id) else {
            debug!("Dropping stored cart entry for unknown product {}", entry.product_id);
            continue;
        };
        if !seen.insert(entry.product_id.clone()) {
            continue;
        }

        let quantity = u32::try_from(entry.quantity).unwrap_or(u32::MAX).min(product.stock);
        if quantity == 0 {
            debug!("Dropping stored cart entry for sold-out product {}", product.id);
            continue;
        }

        items.push(CartItem {
            product: product.clone(),
            quantity,
        });
    }

    items
}

/// Writes the full `[{productId, quantity}]` array under `key`.
pub fn write_persisted(store: &dyn KeyValueStore, key: &str, items: &[CartItem]) {
    if let Some(serialized) = serialize_entries(items) {
        store.set(key, serialized);
    }
}

fn serialize_entries(items: &[CartItem]) -> Option<String> {
    let entries: Vec<PersistedCartEntry> = items.iter().map(PersistedCartEntry::from).collect();

    serde_json::to_string(&entries)
        .map_err(|e| warn!("Unable to serialize cart for storage: {}", e))
        .ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
