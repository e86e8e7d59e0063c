pub mod carts;
pub mod listings;
pub mod orders;
pub mod pickups;
pub mod users;
pub mod ws;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::engine::projection::MapSnapshot;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(users::router())
        .merge(listings::router())
        .merge(carts::router())
        .merge(orders::router())
        .merge(pickups::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/snapshot", get(snapshot))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    tick: u64,
    listings: usize,
    orders: usize,
    pickups: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let market = state.market.read().await;

    Json(HealthResponse {
        status: "ok",
        tick: market.tick_count(),
        listings: market.listings().len(),
        orders: market.orders().len(),
        pickups: market.pickups().len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}

async fn snapshot(State(state): State<Arc<AppState>>) -> Json<MapSnapshot> {
    Json(state.snapshot().await)
}
