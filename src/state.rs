//! Storefront Application State
//!
//! Shared catalog and key-value store, plus one [`Session`] per shopper.

use crate::cart::{
    engine::CartEngine, helpers::session_storage_key, persistence::CART_STORAGE_KEY,
    store::{KeyValueStore, MemoryStore},
};
use crate::catalog::{models::Catalog, query::FilterState};
use dashmap::{mapref::one::RefMut, DashMap};
use std::sync::Arc;
use tracing::info;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// What the UI layer holds for one shopper: filters, search and cart
pub struct Session {
    pub filters: FilterState,
    pub search_term: String,
    pub cart: CartEngine,
}

impl Session {
    fn open(catalog: Arc<Catalog>, store: Arc<dyn KeyValueStore>, session_id: &str) -> Self {
        let filters = FilterState::defaults(catalog.price_bounds());
        let storage_key = session_storage_key(CART_STORAGE_KEY, session_id);

        Self {
            filters,
            search_term: String::new(),
            cart: CartEngine::load(catalog, store, storage_key),
        }
    }

    /// Restores default filters and clears the search term.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::defaults(self.cart.catalog().price_bounds());
        self.search_term.clear();
    }
}

/// Core application state containing the catalog and shopper sessions
pub struct AppState {
    pub catalog: Arc<Catalog>,

    /// Where carts are persisted between sessions
    pub store: Arc<dyn KeyValueStore>,

    /// Live sessions keyed by session id.
    /// DashMap allows concurrent access without external Mutexes.
    pub sessions: DashMap<String, Session>,
}

impl AppState {
    /// Creates state over `catalog` with an in-memory cart store
    pub fn new(catalog: Catalog) -> Self {
        Self::with_store(catalog, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Self {
        info!("Serving catalog with {} products", catalog.len());

        Self {
            catalog: Arc::new(catalog),
            store,
            sessions: DashMap::new(),
        }
    }

    /// Returns the session for `session_id`, opening it (and restoring its
    /// persisted cart) on first use.
    pub fn session(&self, session_id: &str) -> RefMut<'_, String, Session> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::open(self.catalog.clone(), self.store.clone(), session_id))
    }
}
