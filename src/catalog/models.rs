//! Catalog Domain Models
//!
//! Product records and the read-only catalog that owns them.

use crate::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, sync::Arc};

/// Category value that disables the category filter
pub const ALL_CATEGORIES: &str = "All";

/// Catalog shipped with the crate
const BUNDLED_CATALOG: &str = include_str!("../../data/products.json");

// =============================================================================
// Catalog Domain Models
// =============================================================================

/// A product offered by the storefront. Never mutated after loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,

    /// Unit price in USD
    pub price: Decimal,

    /// Average review score, 0 to 5
    pub rating: f64,
    pub rating_count: u32,

    /// Units available for purchase
    pub stock: u32,
    pub brand: String,
    pub sku: String,
    pub image_url: String,
    pub free_shipping: bool,
    pub tags: Vec<String>,
    pub release_date: NaiveDate,
    pub colors: Vec<String>,

    #[serde(default)]
    pub bestseller: bool,

    /// Rank used by the featured ordering; higher is more popular
    pub popularity: u32,
}

impl Product {
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Floor/ceiling of the catalog's prices, used as price filter limits
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

/// Ordered, read-only list of products supplied at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids and out-of-range fields.
    pub fn new(products: Vec<Product>) -> StoreResult<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(StoreError::Catalog(format!(
                    "duplicate product id '{}'",
                    product.id
                )));
            }
            if product.price.is_sign_negative() {
                return Err(StoreError::Catalog(format!(
                    "product '{}' has a negative price",
                    product.id
                )));
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(StoreError::Catalog(format!(
                    "product '{}' has rating {} outside 0-5",
                    product.id, product.rating
                )));
            }
        }

        Ok(Self {
            products: products.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parses a JSON array of product records.
    pub fn from_json(raw: &str) -> StoreResult<Self> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        Self::new(products)
    }

    /// Reads a JSON catalog from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// The twelve-product catalog bundled with the crate.
    pub fn bundled() -> StoreResult<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn get(&self, product_id: &str) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whole-dollar price limits: floor of the cheapest, ceiling of the
    /// most expensive product.
    pub fn price_bounds(&self) -> PriceBounds {
        let min = self.products.iter().map(|p| p.price).min();
        let max = self.products.iter().map(|p| p.price).max();

        PriceBounds {
            min: min.map(|m| m.floor()).unwrap_or(Decimal::ZERO),
            max: max.map(|m| m.ceil()).unwrap_or(Decimal::ZERO),
        }
    }

    /// `"All"` followed by each category in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &self.products {
            if !categories.iter().any(|c| *c == product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}
