use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use uuid::Uuid;

use crate::engine::checkout::request_pickup;
use crate::error::AppError;
use crate::models::pickup::Pickup;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listings/:id/pickup", post(create_pickup))
        .route("/pickups", get(list_pickups))
}

async fn create_pickup(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Uuid>,
) -> Result<Json<Pickup>, AppError> {
    let pickup = request_pickup(&state, listing_id).await?;
    Ok(Json(pickup))
}

async fn list_pickups(State(state): State<Arc<AppState>>) -> Json<Vec<Pickup>> {
    Json(state.market.read().await.pickups().to_vec())
}
