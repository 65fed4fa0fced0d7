//! REST API handlers for browsing the catalog

use super::{
    models::{PriceBounds, Product},
    query::{query, CatalogStats, FilterState, FilterUpdate},
};
use crate::cart::{
    helpers::get_or_create_session_id,
    models::SessionInput,
    pricing::{Coupon, AVAILABLE_COUPONS},
};
use crate::state::{SharedState, Session};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Creates routes for catalog-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/catalog", get(overview))
        .route("/catalog/query", post(run_query))
        .route("/catalog/reset", post(reset_filters))
}

/// Static facts the UI needs to build its controls
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogOverview {
    categories: Vec<String>,
    price_bounds: PriceBounds,
    coupons: &'static [Coupon],
    product_count: usize,
}

/// Input for a catalog query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryInput {
    session_id: Option<String>,

    /// Replaces the stored search term when present
    search_term: Option<String>,

    /// Partial filter change merged into the session's filters
    #[serde(default)]
    filters: FilterUpdate,
}

/// A visible product annotated with the shopper's cart state
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductCard {
    product: Arc<Product>,
    in_cart_quantity: u32,
    at_stock_limit: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    session_id: String,
    filters: FilterState,
    search_term: String,
    products: Vec<ProductCard>,
    stats: CatalogStats,
}

impl QueryResponse {
    fn new(session_id: String, session: &Session) -> Self {
        let catalog = session.cart.catalog();
        let visible = query(catalog, &session.filters, &session.search_term);
        let stats = CatalogStats::summarize(&visible, catalog);

        let products = visible
            .into_iter()
            .map(|product| ProductCard {
                in_cart_quantity: session.cart.quantity_of(&product.id),
                at_stock_limit: session.cart.is_at_stock_limit(&product),
                product,
            })
            .collect();

        Self {
            session_id,
            filters: session.filters.clone(),
            search_term: session.search_term.clone(),
            products,
            stats,
        }
    }
}

/// Endpoint: GET /catalog
async fn overview(State(state): State<SharedState>) -> Json<CatalogOverview> {
    Json(CatalogOverview {
        categories: state.catalog.categories(),
        price_bounds: state.catalog.price_bounds(),
        coupons: &AVAILABLE_COUPONS,
        product_count: state.catalog.len(),
    })
}

/// Endpoint: POST /catalog/query
/// Applies a filter/search change to the session and returns the visible
/// products in display order.
async fn run_query(
    State(state): State<SharedState>,
    Json(payload): Json<QueryInput>,
) -> Json<QueryResponse> {
    let session_id = get_or_create_session_id(payload.session_id);
    let bounds = state.catalog.price_bounds();
    let mut session = state.session(&session_id);

    session.filters = session.filters.apply(payload.filters, bounds);
    if let Some(term) = payload.search_term {
        session.search_term = term;
    }
    debug!(
        "Catalog query for {}: {:?} search={:?}",
        session_id, session.filters, session.search_term
    );

    Json(QueryResponse::new(session_id, &session))
}

/// Endpoint: POST /catalog/reset
async fn reset_filters(
    State(state): State<SharedState>,
    Json(payload): Json<SessionInput>,
) -> Json<QueryResponse> {
    let session_id = get_or_create_session_id(payload.session_id);
    let mut session = state.session(&session_id);
    session.reset_filters();

    Json(QueryResponse::new(session_id, &session))
}
