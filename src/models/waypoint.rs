use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub name: String,
    pub location: Waypoint,
}

impl Warehouse {
    pub const DEFAULT_NAME: &'static str = "Home Grown Warehouse";
    pub const DEFAULT_LOCATION: Waypoint = Waypoint::new(33.52, -86.80);

    pub fn new(name: impl Into<String>, location: Waypoint) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

impl Default for Warehouse {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, Self::DEFAULT_LOCATION)
    }
}
