//! Catalog Query Engine
//!
//! Pure filtering and ordering over the catalog. Nothing here holds state;
//! callers keep the [`FilterState`] and re-run [`query`] after every change.

use super::models::{Catalog, PriceBounds, Product, ALL_CATEGORIES};
use crate::format::format_rating;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, sync::Arc};

/// Display order for query results
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Bestsellers first, then by popularity
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    Newest,
}

/// Active filters. `min_price <= max_price` holds after every
/// [`FilterState::apply`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub category: String,
    pub min_price: Decimal,
    pub max_price: Decimal,

    /// Minimum rating threshold
    pub rating: f64,
    pub in_stock_only: bool,
    pub free_shipping_only: bool,
    pub sort_by: SortOption,
}

/// Partial filter change; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub rating: Option<f64>,
    pub in_stock_only: Option<bool>,
    pub free_shipping_only: Option<bool>,
    pub sort_by: Option<SortOption>,
}

impl FilterState {
    /// Everything visible, featured order.
    pub fn defaults(bounds: PriceBounds) -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            min_price: bounds.min,
            max_price: bounds.max,
            rating: 0.0,
            in_stock_only: false,
            free_shipping_only: false,
            sort_by: SortOption::Featured,
        }
    }

    /// Merges `update` and repairs the price range.
    ///
    /// Prices are clamped to `bounds` first. If the range is then inverted,
    /// the field the update did not touch is snapped to the edited one.
    pub fn apply(&self, update: FilterUpdate, bounds: PriceBounds) -> Self {
        let edited_min = update.min_price.is_some();
        let edited_max = update.max_price.is_some();

        let mut merged = Self {
            category: update.category.unwrap_or_else(|| self.category.clone()),
            min_price: update.min_price.unwrap_or(self.min_price),
            max_price: update.max_price.unwrap_or(self.max_price),
            rating: update.rating.unwrap_or(self.rating),
            in_stock_only: update.in_stock_only.unwrap_or(self.in_stock_only),
            free_shipping_only: update.free_shipping_only.unwrap_or(self.free_shipping_only),
            sort_by: update.sort_by.unwrap_or(self.sort_by),
        };

        merged.min_price = merged.min_price.max(bounds.min);
        merged.max_price = merged.max_price.min(bounds.max);

        if merged.min_price > merged.max_price {
            if edited_min {
                merged.max_price = merged.min_price;
            } else if edited_max {
                merged.min_price = merged.max_price;
            }
        }

        merged
    }

    /// True when `product` passes every active predicate except search.
    pub fn admits(&self, product: &Product) -> bool {
        (self.category == ALL_CATEGORIES || product.category == self.category)
            && product.price >= self.min_price
            && product.price <= self.max_price
            && product.rating >= self.rating
            && (!self.in_stock_only || product.is_in_stock())
            && (!self.free_shipping_only || product.free_shipping)
    }
}

/// Case-insensitive substring match against name, brand, or any tag.
/// `needle` must already be trimmed and lowercased; empty matches all.
fn matches_search(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.name.to_lowercase().contains(needle)
        || product.brand.to_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

fn compare(sort_by: SortOption, a: &Product, b: &Product) -> Ordering {
    match sort_by {
        SortOption::PriceAsc => a.price.cmp(&b.price),
        SortOption::PriceDesc => b.price.cmp(&a.price),
        SortOption::RatingDesc => b.rating.total_cmp(&a.rating),
        SortOption::Newest => b.release_date.cmp(&a.release_date),
        SortOption::Featured => b
            .bestseller
            .cmp(&a.bestseller)
            .then_with(|| b.popularity.cmp(&a.popularity)),
    }
}

/// Returns the visible products in display order.
///
/// The sort is stable, so ties keep catalog order.
pub fn query(catalog: &Catalog, filters: &FilterState, search_term: &str) -> Vec<Arc<Product>> {
    let needle = search_term.trim().to_lowercase();

    let mut visible: Vec<Arc<Product>> = catalog
        .products()
        .iter()
        .filter(|p| filters.admits(p) && matches_search(p, &needle))
        .cloned()
        .collect();

    visible.sort_by(|a, b| compare(filters.sort_by, a, b));
    visible
}

/// Summary line shown above the results
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub visible_count: usize,
    pub catalog_count: usize,

    /// Mean rating of the visible products, 0 when nothing is visible
    pub average_rating: f64,

    /// Average rating to one decimal place, absent when nothing is visible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating_label: Option<String>,

    /// Units in stock across the visible products
    pub total_inventory: u64,
}

impl CatalogStats {
    pub fn summarize(visible: &[Arc<Product>], catalog: &Catalog) -> Self {
        let average_rating = if visible.is_empty() {
            0.0
        } else {
            visible.iter().map(|p| p.rating).sum::<f64>() / visible.len() as f64
        };

        Self {
            visible_count: visible.len(),
            catalog_count: catalog.len(),
            average_rating,
            average_rating_label: (!visible.is_empty()).then(|| format_rating(average_rating)),
            total_inventory: visible.iter().map(|p| u64::from(p.stock)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn setup() -> (Catalog, FilterState) {
        let catalog = Catalog::bundled().unwrap();
        let filters = FilterState::defaults(catalog.price_bounds());
        (catalog, filters)
    }

    fn names(products: &[Arc<Product>]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_defaults_show_everything() {
        let (catalog, filters) = setup();
        assert_eq!(query(&catalog, &filters, "").len(), 12);
    }

    #[test]
    fn test_search_matches_name_brand_and_tags() {
        let (catalog, filters) = setup();

        let by_name = query(&catalog, &filters, "  DRONE ");
        assert_eq!(names(&by_name), vec!["Horizon 4K Explorer Drone"]);

        let by_brand = query(&catalog, &filters, "ember forge");
        assert_eq!(names(&by_brand), vec!["Ember Cast Iron Skillet Set"]);

        let by_tag = query(&catalog, &filters, "camping");
        assert_eq!(names(&by_tag), vec!["Cascade Insulated Water Bottle"]);
    }

    #[test]
    fn test_featured_puts_bestsellers_first_by_popularity() {
        let (catalog, filters) = setup();
        let results = query(&catalog, &filters, "");

        let leading: Vec<&str> = results.iter().take(5).map(|p| p.id.as_str()).collect();
        assert_eq!(
            leading,
            vec![
                "product-aurora-headphones",
                "product-vertex-keyboard",
                "product-momentum-smartwatch",
                "product-ember-skillet",
                "product-horizon-drone",
            ]
        );
        assert!(results[5..].iter().all(|p| !p.bestseller));
        assert_eq!(results[5].id, "product-nimbus-purifier");
    }

    #[test]
    fn test_raising_min_above_max_pulls_max_up() {
        let (catalog, filters) = setup();
        let bounds = catalog.price_bounds();

        let narrowed = filters.apply(
            FilterUpdate {
                max_price: Some(dec!(100)),
                ..Default::default()
            },
            bounds,
        );
        let repaired = narrowed.apply(
            FilterUpdate {
                min_price: Some(dec!(150)),
                ..Default::default()
            },
            bounds,
        );

        assert_eq!(repaired.min_price, dec!(150));
        assert_eq!(repaired.max_price, dec!(150));
    }

    #[test]
    fn test_lowering_max_below_min_pulls_min_down() {
        let (catalog, filters) = setup();
        let bounds = catalog.price_bounds();

        let raised = filters.apply(
            FilterUpdate {
                min_price: Some(dec!(200)),
                ..Default::default()
            },
            bounds,
        );
        let repaired = raised.apply(
            FilterUpdate {
                max_price: Some(dec!(120)),
                ..Default::default()
            },
            bounds,
        );

        assert_eq!(repaired.min_price, dec!(120));
        assert_eq!(repaired.max_price, dec!(120));
    }

    #[test]
    fn test_prices_clamp_to_catalog_bounds() {
        let (catalog, filters) = setup();
        let bounds = catalog.price_bounds();

        let widened = filters.apply(
            FilterUpdate {
                min_price: Some(dec!(-10)),
                max_price: Some(dec!(9999)),
                ..Default::default()
            },
            bounds,
        );

        assert_eq!(widened.min_price, bounds.min);
        assert_eq!(widened.max_price, bounds.max);
    }

    #[test]
    fn test_min_beyond_catalog_shows_nothing() {
        let (catalog, filters) = setup();
        let bounds = catalog.price_bounds();

        let updated = filters.apply(
            FilterUpdate {
                min_price: Some(dec!(600)),
                ..Default::default()
            },
            bounds,
        );

        assert!(updated.min_price <= updated.max_price);
        assert!(query(&catalog, &updated, "").is_empty());
    }

    #[test]
    fn test_stats_for_empty_and_full_results() {
        let (catalog, filters) = setup();

        let all = query(&catalog, &filters, "");
        let stats = CatalogStats::summarize(&all, &catalog);
        assert_eq!(stats.visible_count, 12);
        assert_eq!(stats.catalog_count, 12);
        assert_eq!(stats.total_inventory, 332);
        assert!(stats.average_rating > 4.0);
        assert_eq!(
            stats.average_rating_label,
            Some(format_rating(stats.average_rating))
        );

        let single = query(&catalog, &filters, "skillet");
        let stats = CatalogStats::summarize(&single, &catalog);
        assert_eq!(stats.average_rating_label.as_deref(), Some("4.9"));

        let none = query(&catalog, &filters, "no such product");
        let stats = CatalogStats::summarize(&none, &catalog);
        assert_eq!(stats.visible_count, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.average_rating_label, None);
        assert_eq!(stats.total_inventory, 0);
    }
}
