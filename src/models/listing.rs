use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Vegetables,
    Fruits,
    Herbs,
    Grains,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Lb,
    Oz,
    Bunch,
    Each,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Submitted by a farmer, still on the farm.
    Pending,
    /// Collected into the warehouse and visible to shoppers.
    Available,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub price_per_unit: f64,
    pub available_qty: u32,
    pub unit: Unit,
    pub farm: String,
    pub status: ListingStatus,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_available(&self) -> bool {
        self.status == ListingStatus::Available
    }

    /// Removes `qty` units from stock, flooring at zero.
    pub fn take(&mut self, qty: u32) {
        self.available_qty = self.available_qty.saturating_sub(qty);
    }
}

/// A farmer's listing form before it has an id or an owner.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub category: Category,
    pub price_per_unit: f64,
    pub unit: Unit,
    pub available_qty: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl ListingDraft {
    pub fn into_listing(self, farm: &str) -> Result<Listing, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidListing("title cannot be empty"));
        }

        if !self.price_per_unit.is_finite() || self.price_per_unit <= 0.0 {
            return Err(AppError::InvalidListing("price_per_unit must be > 0"));
        }

        if self.available_qty == 0 {
            return Err(AppError::InvalidListing("available_qty must be > 0"));
        }

        Ok(Listing {
            id: Uuid::now_v7(),
            title: title.to_string(),
            category: self.category,
            price_per_unit: self.price_per_unit,
            available_qty: self.available_qty,
            unit: self.unit,
            farm: farm.to_string(),
            status: ListingStatus::Pending,
            image: self.image,
            created_at: Utc::now(),
        })
    }
}
