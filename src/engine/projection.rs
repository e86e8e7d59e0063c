use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::order::{Order, OrderStatus};
use crate::models::pickup::{Pickup, PickupPhase};
use crate::models::waypoint::{Warehouse, Waypoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLine {
    pub from: Waypoint,
    pub to: Waypoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryView {
    pub order_id: Uuid,
    pub route: RouteLine,
    pub driver: Waypoint,
    pub status: OrderStatus,
    pub status_index: u8,
    pub status_label: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub pickup_id: Uuid,
    pub listing_id: Uuid,
    pub farm: String,
    pub route: RouteLine,
    /// Absent until the driver has left the warehouse.
    pub driver: Option<Waypoint>,
    pub phase: PickupPhase,
    pub phase_index: u8,
    pub phase_label: String,
}

/// Everything a map client needs to redraw after a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub tick: u64,
    pub warehouse: Warehouse,
    pub deliveries: Vec<DeliveryView>,
    pub pickups: Vec<PickupView>,
}

impl DeliveryView {
    pub fn from_order(order: &Order, warehouse: &Warehouse) -> Self {
        Self {
            order_id: order.id,
            route: RouteLine {
                from: warehouse.location,
                to: order.dropoff,
            },
            driver: order.driver_pos,
            status: order.status,
            status_index: order.status.index(),
            status_label: order.status.label().to_string(),
            item_count: order.items.len(),
        }
    }
}

impl PickupView {
    pub fn from_pickup(pickup: &Pickup, warehouse: &Warehouse) -> Self {
        Self {
            pickup_id: pickup.id,
            listing_id: pickup.listing_id,
            farm: pickup.farm.clone(),
            route: RouteLine {
                from: warehouse.location,
                to: pickup.farm_location,
            },
            driver: pickup.driver_pos,
            phase: pickup.phase,
            phase_index: pickup.phase.index(),
            phase_label: pickup.phase.label().to_string(),
        }
    }
}

/// Newest orders first, pickups in request order.
pub fn project(tick: u64, warehouse: &Warehouse, orders: &[Order], pickups: &[Pickup]) -> MapSnapshot {
    MapSnapshot {
        tick,
        warehouse: warehouse.clone(),
        deliveries: orders
            .iter()
            .rev()
            .map(|order| DeliveryView::from_order(order, warehouse))
            .collect(),
        pickups: pickups
            .iter()
            .map(|pickup| PickupView::from_pickup(pickup, warehouse))
            .collect(),
    }
}
