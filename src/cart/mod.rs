//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (CartItem, persisted entries, totals, inputs, views)
//! - Key-value storage and cart persistence/reconciliation
//! - Pricing and the coupon catalog
//! - The stateful cart engine
//! - REST API handlers

pub mod engine;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod persistence;
pub mod pricing;
pub mod store;

// Re-export commonly used types for convenience
pub use engine::CartEngine;
pub use handlers::routes;
pub use store::{KeyValueStore, MemoryStore};
