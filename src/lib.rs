//! Storefront Library
//!
//! This library provides the core functionality for a storefront: catalog
//! filtering/search/sort, a stock-bounded shopping cart with persisted
//! state, and coupon-based pricing, served over a small JSON API.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod format;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod state;
