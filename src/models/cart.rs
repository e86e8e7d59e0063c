use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::listing::Unit;
use crate::models::order::OrderTotals;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartEntry {
    pub listing_id: Uuid,
    pub qty: u32,
}

/// Requested quantities, at most one entry per listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `qty` of a listing, merging with an existing entry. Zero is ignored.
    pub fn add(&mut self, listing_id: Uuid, qty: u32) {
        if qty == 0 {
            return;
        }

        match self.entries.iter_mut().find(|e| e.listing_id == listing_id) {
            Some(entry) => entry.qty = entry.qty.saturating_add(qty),
            None => self.entries.push(CartEntry { listing_id, qty }),
        }
    }

    pub fn remove(&mut self, listing_id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.listing_id != listing_id);
        self.entries.len() != before
    }

    pub fn total_qty(&self) -> u32 {
        self.entries.iter().map(|e| e.qty).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub listing_id: Uuid,
    pub title: String,
    pub unit: Unit,
    pub price_per_unit: f64,
    pub qty: u32,
    pub farm: String,
    pub line_subtotal: f64,
}

/// Priced view of a cart. Entries whose listing no longer exists are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total_qty: u32,
    pub totals: OrderTotals,
}
