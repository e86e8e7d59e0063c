use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use uuid::Uuid;

use crate::api::rest::users::farm_name_of;
use crate::error::AppError;
use crate::models::listing::{Listing, ListingDraft};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listings", get(list_visible))
        .route("/listings/all", get(list_all))
        .route("/listings/:id", get(get_listing))
        .route(
            "/farmers/:id/listings",
            get(list_farm_listings).post(submit_listing),
        )
}

async fn list_visible(State(state): State<Arc<AppState>>) -> Json<Vec<Listing>> {
    let market = state.market.read().await;
    Json(market.visible_listings().cloned().collect())
}

async fn list_all(State(state): State<Arc<AppState>>) -> Json<Vec<Listing>> {
    Json(state.market.read().await.listings().to_vec())
}

async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, AppError> {
    let market = state.market.read().await;
    let listing = market
        .listing(id)
        .ok_or(AppError::ListingNotFound(id))?;

    Ok(Json(listing.clone()))
}

async fn list_farm_listings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Listing>>, AppError> {
    let farm = farm_name_of(&state, id)?;
    let market = state.market.read().await;
    Ok(Json(market.listings_for_farm(&farm).cloned().collect()))
}

async fn submit_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ListingDraft>,
) -> Result<Json<Listing>, AppError> {
    let farm = farm_name_of(&state, id)?;
    let listing = state.market.write().await.submit_listing(&farm, payload)?;
    Ok(Json(listing))
}
