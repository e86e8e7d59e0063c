use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::market::FarmerDashboard;
use crate::error::AppError;
use crate::models::user::{FarmProfile, Role, UserProfile};
use crate::models::waypoint::Waypoint;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/shoppers", post(create_shopper))
        .route("/users/farmers", post(create_farmer))
        .route("/users/:id", get(get_user))
        .route("/users/:id/farm", post(become_farmer))
        .route("/users/:id/dashboard", get(farmer_dashboard))
}

#[derive(Deserialize)]
pub struct CreateShopperRequest {
    pub identifier: String,
    #[serde(default)]
    pub location: Option<Waypoint>,
}

#[derive(Deserialize)]
pub struct FarmDetails {
    pub farm_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub about: String,
}

#[derive(Deserialize)]
pub struct CreateFarmerRequest {
    pub identifier: String,
    #[serde(flatten)]
    pub farm: FarmDetails,
}

async fn create_shopper(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateShopperRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if payload.identifier.trim().is_empty() {
        return Err(AppError::BadRequest("identifier cannot be empty".to_string()));
    }

    if payload.location.is_some_and(|location| !location.is_finite()) {
        return Err(AppError::BadRequest("location must be finite".to_string()));
    }

    let user = UserProfile {
        id: Uuid::new_v4(),
        role: Role::Shopper,
        identifier: payload.identifier,
        location: payload.location,
        farm: None,
        created_at: Utc::now(),
    };

    state.users.insert(user.id, user.clone());
    Ok(Json(user))
}

async fn create_farmer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFarmerRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if payload.identifier.trim().is_empty() {
        return Err(AppError::BadRequest("identifier cannot be empty".to_string()));
    }

    let user = UserProfile {
        id: Uuid::new_v4(),
        role: Role::Farmer,
        identifier: payload.identifier,
        location: None,
        farm: Some(register_farm(&state, payload.farm).await?),
        created_at: Utc::now(),
    };

    info!(user_id = %user.id, farm = ?user.farm_name(), "farmer registered");
    state.users.insert(user.id, user.clone());
    Ok(Json(user))
}

/// Converts an existing shopper account into a farmer account.
async fn become_farmer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FarmDetails>,
) -> Result<Json<UserProfile>, AppError> {
    match state.users.get(&id) {
        None => return Err(AppError::UserNotFound(id)),
        Some(user) if user.farm.is_some() => return Err(AppError::AlreadyFarmer(id)),
        Some(_) => {}
    }

    let farm = register_farm(&state, payload).await?;

    let mut user = state.users.get_mut(&id).ok_or(AppError::UserNotFound(id))?;
    user.role = Role::Farmer;
    user.farm = Some(farm);

    info!(user_id = %id, farm = ?user.farm_name(), "shopper converted to farmer");
    Ok(Json(user.clone()))
}

/// Validates the farm details and places the new farm near the warehouse.
async fn register_farm(state: &AppState, details: FarmDetails) -> Result<FarmProfile, AppError> {
    let farm_name = details.farm_name.trim().to_string();
    if farm_name.is_empty() {
        return Err(AppError::BadRequest("farm_name cannot be empty".to_string()));
    }

    let mut market = state.market.write().await;
    if market.farm_location(&farm_name).is_some() {
        return Err(AppError::FarmExists(farm_name));
    }
    let location = market.register_new_farm(&farm_name);

    Ok(FarmProfile {
        farm_name,
        address: details.address,
        about: details.about,
        location,
    })
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .users
        .get(&id)
        .ok_or(AppError::UserNotFound(id))?;

    Ok(Json(user.value().clone()))
}

async fn farmer_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FarmerDashboard>, AppError> {
    let farm = farm_name_of(&state, id)?;
    let dashboard = state.market.read().await.farmer_dashboard(&farm);
    Ok(Json(dashboard))
}

/// Looks up the farm owned by a farmer account.
pub fn farm_name_of(state: &AppState, user_id: Uuid) -> Result<String, AppError> {
    let user = state
        .users
        .get(&user_id)
        .ok_or(AppError::UserNotFound(user_id))?;

    user.farm_name()
        .map(str::to_string)
        .ok_or(AppError::NotAFarmer(user_id))
}
