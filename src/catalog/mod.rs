//! Product Catalog Module
//!
//! This module contains the read-only product catalog, including:
//! - Domain models (Product, Catalog, price bounds)
//! - The catalog query engine (filters, search, ordering, stats)
//! - REST API handlers

pub mod handlers;
pub mod models;
pub mod query;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{Catalog, Product};
pub use query::{query, FilterState, FilterUpdate, SortOption};
