use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::order::OrderStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("listing {0} not found")]
    ListingNotFound(Uuid),

    #[error("order {0} not found")]
    OrderNotFound(Uuid),

    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("invalid listing: {0}")]
    InvalidListing(&'static str),

    #[error("listing {0} is not available yet")]
    ListingUnavailable(Uuid),

    #[error("user {0} is not a farmer")]
    NotAFarmer(Uuid),

    #[error("user {0} already runs a farm")]
    AlreadyFarmer(Uuid),

    #[error("farm {0} already exists")]
    FarmExists(String),

    #[error("pickup already in progress for listing {0}")]
    PickupInProgress(Uuid),

    #[error("status {0:?} is set by the delivery simulation")]
    StatusNotSettable(OrderStatus),

    #[error("order {order_id} is already {current:?}")]
    StatusRegression { order_id: Uuid, current: OrderStatus },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ListingNotFound(_) | AppError::OrderNotFound(_) | AppError::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidListing(_)
            | AppError::ListingUnavailable(_)
            | AppError::NotAFarmer(_)
            | AppError::StatusNotSettable(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyFarmer(_)
            | AppError::FarmExists(_)
            | AppError::PickupInProgress(_)
            | AppError::StatusRegression { .. } => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}
