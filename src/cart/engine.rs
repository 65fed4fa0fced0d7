//! Stateful cart with quantity clamping, persistence and coupon tracking.

use super::{
    helpers::format_item_summary,
    models::{CartItem, CartTotals},
    persistence::{restore, write_persisted},
    pricing::{self, check_coupon, Coupon, CouponActionResult},
    store::KeyValueStore,
};
use crate::catalog::models::{Catalog, Product};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// A shopper's cart bound to a catalog and a key-value store.
///
/// Holds at most one line per product and never a line with zero quantity.
/// Every state change is written back to the store under `storage_key`.
pub struct CartEngine {
    catalog: Arc<Catalog>,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    items: Vec<CartItem>,
    applied_coupon: Option<Coupon>,
}

impl CartEngine {
    /// Restores the cart saved under `storage_key`, reconciled against
    /// `catalog`. A stale stored cart is replaced by the reconciled one.
    pub fn load(
        catalog: Arc<Catalog>,
        store: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let items = restore(&catalog, store.as_ref(), &storage_key);
        debug!("Loaded cart {} with {} line(s)", storage_key, items.len());

        Self {
            catalog,
            store,
            storage_key,
            items,
            applied_coupon: None,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of `product_id` in the cart, 0 when absent.
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.product.id == product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// True when no more units of an in-stock product can be added.
    pub fn is_at_stock_limit(&self, product: &Product) -> bool {
        product.is_in_stock() && self.quantity_of(&product.id) >= product.stock
    }

    pub fn applied_coupon(&self) -> Option<&Coupon> {
        self.applied_coupon.as_ref()
    }

    pub fn subtotal(&self) -> Decimal {
        pricing::subtotal(&self.items)
    }

    pub fn totals(&self) -> CartTotals {
        pricing::compute_totals(&self.items, self.applied_coupon.as_ref())
    }

    pub fn item_summary(&self) -> String {
        format_item_summary(&self.items)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `quantity` units, capped at the product's stock.
    ///
    /// Returns false and writes nothing when the cart is unchanged (sold
    /// out, zero quantity, or already at the stock ceiling).
    pub fn add_item(&mut self, product: &Arc<Product>, quantity: u32) -> bool {
        if product.stock == 0 || quantity == 0 {
            return false;
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            let desired = existing.quantity.saturating_add(quantity).min(product.stock);
            if desired == existing.quantity {
                return false;
            }
            existing.quantity = desired;
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: quantity.min(product.stock),
            });
        }

        self.commit();
        true
    }

    /// Sets a line's quantity, clamped to stock. Zero or negative removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.items.retain(|i| i.product.id != product_id);
        } else {
            let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
            for item in self.items.iter_mut().filter(|i| i.product.id == product_id) {
                item.quantity = requested.min(item.product.stock);
            }
            self.items.retain(|i| i.quantity > 0);
        }

        self.commit();
    }

    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product.id != product_id);
        self.commit();
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.commit();
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    /// Validates `code` against the current subtotal and applies it.
    ///
    /// A rejected code leaves any previously applied coupon in place.
    pub fn apply_coupon(&mut self, code: &str) -> CouponActionResult {
        let outcome = check_coupon(code, self.subtotal());
        match &outcome {
            Ok(coupon) => {
                info!("Coupon {} applied to cart {}", coupon.code, self.storage_key);
                self.applied_coupon = Some(**coupon);
            }
            Err(rejection) => debug!("Coupon rejected for cart {}: {}", self.storage_key, rejection),
        }
        CouponActionResult::from(outcome)
    }

    pub fn remove_coupon(&mut self) {
        self.applied_coupon = None;
    }

    /// Persists the lines and drops a coupon the new subtotal no longer
    /// qualifies for.
    fn commit(&mut self) {
        write_persisted(self.store.as_ref(), &self.storage_key, &self.items);

        let subtotal = self.subtotal();
        if let Some(coupon) = self.applied_coupon {
            if !coupon.is_eligible(subtotal) {
                info!(
                    "Coupon {} revoked for cart {}: subtotal {} below minimum {}",
                    coupon.code, self.storage_key, subtotal, coupon.minimum_subtotal
                );
                self.applied_coupon = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{persistence::CART_STORAGE_KEY, store::MemoryStore};
    use rust_decimal_macros::dec;

    fn setup() -> (Arc<Catalog>, Arc<MemoryStore>, CartEngine) {
        let catalog = Arc::new(Catalog::bundled().unwrap());
        let store = Arc::new(MemoryStore::new());
        let cart = CartEngine::load(catalog.clone(), store.clone(), CART_STORAGE_KEY);
        (catalog, store, cart)
    }

    #[test]
    fn test_add_item_caps_at_stock() {
        let (catalog, _, mut cart) = setup();
        let drone = catalog.get("product-horizon-drone").unwrap().clone();

        assert!(cart.add_item(&drone, 5));
        assert!(cart.add_item(&drone, 5));
        assert_eq!(cart.quantity_of(&drone.id), 8);
        assert!(cart.is_at_stock_limit(&drone));

        assert!(!cart.add_item(&drone, 1));
        assert_eq!(cart.quantity_of(&drone.id), 8);
    }

    #[test]
    fn test_sold_out_product_is_not_added() {
        let (catalog, store, mut cart) = setup();
        let pillow = catalog.get("product-solace-pillow").unwrap().clone();

        assert!(!cart.add_item(&pillow, 1));
        assert!(cart.is_empty());
        assert_eq!(store.get(CART_STORAGE_KEY), None);
    }

    #[test]
    fn test_coupon_survives_rejected_code() {
        let (catalog, _, mut cart) = setup();
        let watch = catalog.get("product-momentum-smartwatch").unwrap().clone();
        cart.add_item(&watch, 1);

        assert!(cart.apply_coupon("SAVE10").success);
        assert!(!cart.apply_coupon("NOPE").success);
        assert_eq!(cart.applied_coupon().map(|c| c.code), Some("SAVE10"));
    }

    #[test]
    fn test_coupon_revoked_when_subtotal_drops() {
        let (catalog, _, mut cart) = setup();
        let watch = catalog.get("product-momentum-smartwatch").unwrap().clone();
        let bottle = catalog.get("product-cascade-bottle").unwrap().clone();
        cart.add_item(&watch, 1);
        cart.add_item(&bottle, 1);

        assert!(cart.apply_coupon("welcome15").success);
        assert_eq!(cart.totals().discount, dec!(288.50) * dec!(0.15));

        cart.remove_item(&watch.id);
        assert!(cart.applied_coupon().is_none());
        assert_eq!(cart.totals().discount, Decimal::ZERO);
    }
}
