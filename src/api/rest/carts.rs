use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::checkout::checkout;
use crate::error::AppError;
use crate::models::cart::CartSummary;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/carts/:shopper_id", get(get_cart))
        .route("/carts/:shopper_id/items", post(add_item))
        .route("/carts/:shopper_id/items/:listing_id", delete(remove_item))
        .route("/carts/:shopper_id/checkout", post(place_order))
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub listing_id: Uuid,
    pub qty: u32,
}

async fn summarize(state: &AppState, shopper_id: Uuid) -> CartSummary {
    let cart = state
        .carts
        .get(&shopper_id)
        .map(|cart| cart.value().clone())
        .unwrap_or_default();

    state.market.read().await.cart_summary(&cart)
}

async fn get_cart(
    State(state): State<Arc<AppState>>,
    Path(shopper_id): Path<Uuid>,
) -> Json<CartSummary> {
    Json(summarize(&state, shopper_id).await)
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(shopper_id): Path<Uuid>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<CartSummary>, AppError> {
    if payload.qty == 0 {
        return Err(AppError::BadRequest("qty must be > 0".to_string()));
    }

    {
        // Cart edits hold the market lock so they never interleave with checkout.
        let market = state.market.read().await;
        let listing = market
            .listing(payload.listing_id)
            .ok_or(AppError::ListingNotFound(payload.listing_id))?;

        if !listing.is_available() {
            return Err(AppError::ListingUnavailable(payload.listing_id));
        }

        state
            .carts
            .entry(shopper_id)
            .or_default()
            .add(payload.listing_id, payload.qty);
    }

    Ok(Json(summarize(&state, shopper_id).await))
}

async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((shopper_id, listing_id)): Path<(Uuid, Uuid)>,
) -> Json<CartSummary> {
    {
        let _market = state.market.read().await;
        if let Some(mut cart) = state.carts.get_mut(&shopper_id) {
            cart.remove(listing_id);
        }
    }

    Json(summarize(&state, shopper_id).await)
}

async fn place_order(
    State(state): State<Arc<AppState>>,
    Path(shopper_id): Path<Uuid>,
) -> Response {
    match checkout(&state, shopper_id).await {
        Some(order) => Json(order).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
