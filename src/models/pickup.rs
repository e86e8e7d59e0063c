use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::waypoint::Waypoint;

/// Leg of the warehouse -> farm -> warehouse round trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum PickupPhase {
    ToFarm = 0,
    ToWarehouse = 1,
}

impl PickupPhase {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            PickupPhase::ToFarm => "Heading to farm",
            PickupPhase::ToWarehouse => "Returning to warehouse",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub farm: String,
    pub farm_location: Waypoint,
    /// `None` until the first tick; the driver then starts at the warehouse.
    pub driver_pos: Option<Waypoint>,
    pub phase: PickupPhase,
}
