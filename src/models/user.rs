use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::waypoint::Waypoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Shopper,
    Farmer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmProfile {
    pub farm_name: String,
    pub address: String,
    pub about: String,
    pub location: Waypoint,
}

/// Profile data collected at signup. Nothing here is verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub role: Role,
    pub identifier: String,
    pub location: Option<Waypoint>,
    pub farm: Option<FarmProfile>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn farm_name(&self) -> Option<&str> {
        self.farm.as_ref().map(|farm| farm.farm_name.as_str())
    }
}
