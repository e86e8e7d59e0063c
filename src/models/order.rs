use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::listing::Unit;
use crate::models::waypoint::Waypoint;

/// Delivery stages in the order they are reached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum OrderStatus {
    Placed = 0,
    Confirmed = 1,
    Preparing = 2,
    OutForDelivery = 3,
    Delivered = 4,
}

impl OrderStatus {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Delivered
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub title: String,
    pub unit: Unit,
    pub price_per_unit: f64,
    pub qty: u32,
    pub farm: String,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.price_per_unit * f64::from(self.qty)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub customer_markup: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub driver_pos: Waypoint,
    pub dropoff: Waypoint,
    pub status: OrderStatus,
}
