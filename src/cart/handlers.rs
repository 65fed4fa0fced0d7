//! REST API handlers for shopping cart operations
//!
//! This module implements HTTP endpoints for cart mutations, coupon
//! handling and cart views.

use super::{helpers::*, models::*};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::info;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", post(view_cart))
        .route("/cart/add", post(add_item))
        .route("/cart/update", post(update_quantity))
        .route("/cart/remove", post(remove_item))
        .route("/cart/clear", post(clear_cart))
        .route("/cart/coupon", post(apply_coupon))
        .route("/cart/coupon/remove", post(remove_coupon))
}

fn unknown_product(product_id: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Unknown product: {}", product_id) })),
    )
}

/// Endpoint: POST /cart
/// Returns the session's cart without changing it.
async fn view_cart(
    State(state): State<SharedState>,
    Json(payload): Json<SessionInput>,
) -> Json<CartView> {
    let session_id = get_or_create_session_id(payload.session_id);
    let session = state.session(&session_id);

    Json(CartView::new(session_id, &session.cart))
}

/// Endpoint: POST /cart/add
/// Adds units of a catalog product, capped at its stock.
async fn add_item(
    State(state): State<SharedState>,
    Json(payload): Json<AddItemInput>,
) -> ApiResult<CartView> {
    let product = state
        .catalog
        .get(&payload.product_id)
        .cloned()
        .ok_or_else(|| unknown_product(&payload.product_id))?;

    let session_id = get_or_create_session_id(payload.session_id);
    let mut session = state.session(&session_id);
    session.cart.add_item(&product, payload.quantity);

    Ok(Json(CartView::new(session_id, &session.cart)))
}

/// Endpoint: POST /cart/update
/// Sets a line's quantity; zero or negative removes the line.
async fn update_quantity(
    State(state): State<SharedState>,
    Json(payload): Json<UpdateQuantityInput>,
) -> Json<CartView> {
    let session_id = get_or_create_session_id(payload.session_id);
    let mut session = state.session(&session_id);
    session.cart.update_quantity(&payload.product_id, payload.quantity);

    Json(CartView::new(session_id, &session.cart))
}

/// Endpoint: POST /cart/remove
async fn remove_item(
    State(state): State<SharedState>,
    Json(payload): Json<RemoveItemInput>,
) -> Json<CartView> {
    let session_id = get_or_create_session_id(payload.session_id);
    let mut session = state.session(&session_id);
    session.cart.remove_item(&payload.product_id);

    Json(CartView::new(session_id, &session.cart))
}

/// Endpoint: POST /cart/clear
async fn clear_cart(
    State(state): State<SharedState>,
    Json(payload): Json<SessionInput>,
) -> Json<CartView> {
    let session_id = get_or_create_session_id(payload.session_id);
    let mut session = state.session(&session_id);

    if !session.cart.is_empty() {
        info!("Clearing cart {} - {}", session_id, session.cart.item_summary());
    }
    session.cart.clear_cart();

    Json(CartView::new(session_id, &session.cart))
}

/// Endpoint: POST /cart/coupon
/// Applies a coupon code; rejections are reported in the body, not as errors.
async fn apply_coupon(
    State(state): State<SharedState>,
    Json(payload): Json<CouponInput>,
) -> Json<CouponResponse> {
    let session_id = get_or_create_session_id(payload.session_id);
    let mut session = state.session(&session_id);
    let outcome = session.cart.apply_coupon(&payload.code);

    Json(CouponResponse {
        success: outcome.success,
        message: outcome.message,
        cart: CartView::new(session_id, &session.cart),
    })
}

/// Endpoint: POST /cart/coupon/remove
async fn remove_coupon(
    State(state): State<SharedState>,
    Json(payload): Json<SessionInput>,
) -> Json<CartView> {
    let session_id = get_or_create_session_id(payload.session_id);
    let mut session = state.session(&session_id);
    session.cart.remove_coupon();

    Json(CartView::new(session_id, &session.cart))
}
