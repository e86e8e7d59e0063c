use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{Order, OrderStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", patch(update_order_status))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<Order>> {
    let market = state.market.read().await;
    Json(market.orders().iter().rev().cloned().collect())
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let market = state.market.read().await;
    let order = market
        .order(id)
        .ok_or(AppError::OrderNotFound(id))?;

    Ok(Json(order.clone()))
}

async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .market
        .write()
        .await
        .set_order_status(id, payload.status)?;

    Ok(Json(order))
}
