use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::engine::pricing::compute_totals;
use crate::geo::random_nearby;
use crate::models::cart::CartEntry;
use crate::models::listing::Listing;
use crate::models::order::{LineItem, Order, OrderStatus};
use crate::models::pickup::{Pickup, PickupPhase};
use crate::models::waypoint::Waypoint;

/// Known farm locations, keyed by farm name.
#[derive(Debug, Clone, Default)]
pub struct FarmDirectory {
    farms: HashMap<String, Waypoint>,
}

impl FarmDirectory {
    pub fn register(&mut self, farm: impl Into<String>, location: Waypoint) {
        self.farms.insert(farm.into(), location);
    }

    pub fn get(&self, farm: &str) -> Option<Waypoint> {
        self.farms.get(farm).copied()
    }

    /// Returns the farm's registered location, or places an unknown farm at a
    /// random point near `reference` and remembers it.
    pub fn resolve(&mut self, farm: &str, reference: &Waypoint, rng: &mut impl Rng) -> Waypoint {
        if let Some(location) = self.get(farm) {
            return location;
        }

        let location = random_nearby(reference, rng);
        self.farms.insert(farm.to_string(), location);
        location
    }

    pub fn len(&self) -> usize {
        self.farms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.farms.is_empty()
    }
}

/// Builds an order from the cart against a listings snapshot. Entries whose
/// listing is gone are dropped from the order.
pub fn create_order(
    cart: &[CartEntry],
    listings: &[Listing],
    dropoff: Waypoint,
    warehouse: Waypoint,
) -> Order {
    let items: Vec<LineItem> = cart
        .iter()
        .filter_map(|entry| {
            let listing = listings.iter().find(|l| l.id == entry.listing_id)?;
            Some(LineItem {
                title: listing.title.clone(),
                unit: listing.unit,
                price_per_unit: listing.price_per_unit,
                qty: entry.qty,
                farm: listing.farm.clone(),
            })
        })
        .collect();

    let totals = compute_totals(&items);

    Order {
        id: Uuid::now_v7(),
        created_at: Utc::now(),
        items,
        totals,
        driver_pos: warehouse,
        dropoff,
        status: OrderStatus::Placed,
    }
}

pub fn create_pickup(listing: &Listing, farm_location: Waypoint) -> Pickup {
    Pickup {
        id: Uuid::now_v7(),
        listing_id: listing.id,
        farm: listing.farm.clone(),
        farm_location,
        driver_pos: None,
        phase: PickupPhase::ToFarm,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    use super::{FarmDirectory, create_order, create_pickup};
    use crate::geo::NEARBY_SPREAD;
    use crate::models::cart::CartEntry;
    use crate::models::listing::{Category, Listing, ListingStatus, Unit};
    use crate::models::order::OrderStatus;
    use crate::models::pickup::PickupPhase;
    use crate::models::waypoint::Waypoint;

    const WAREHOUSE: Waypoint = Waypoint::new(33.52, -86.8);

    fn listing(id_seed: u128, price: f64, qty: u32) -> Listing {
        Listing {
            id: Uuid::from_u128(id_seed),
            title: format!("item-{id_seed}"),
            category: Category::Fruits,
            price_per_unit: price,
            available_qty: qty,
            unit: Unit::Lb,
            farm: "Green Valley".to_string(),
            status: ListingStatus::Available,
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn order_starts_placed_at_the_warehouse() {
        let listings = vec![listing(1, 2.0, 10), listing(2, 5.0, 10)];
        let cart = [
            CartEntry { listing_id: Uuid::from_u128(1), qty: 3 },
            CartEntry { listing_id: Uuid::from_u128(2), qty: 1 },
        ];
        let dropoff = Waypoint::new(33.53, -86.79);

        let order = create_order(&cart, &listings, dropoff, WAREHOUSE);

        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.driver_pos, WAREHOUSE);
        assert_eq!(order.dropoff, dropoff);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].farm, "Green Valley");
        assert!((order.totals.total - 23.05).abs() < 1e-9);
    }

    #[test]
    fn missing_listings_are_silently_dropped() {
        let listings = vec![listing(1, 2.0, 10)];
        let cart = [
            CartEntry { listing_id: Uuid::from_u128(1), qty: 1 },
            CartEntry { listing_id: Uuid::from_u128(99), qty: 4 },
        ];

        let order = create_order(&cart, &listings, WAREHOUSE, WAREHOUSE);

        assert_eq!(order.items.len(), 1);
        assert!((order.totals.subtotal - 2.0).abs() < 1e-9);
    }

    #[test]
    fn pickup_starts_outbound_without_position() {
        let l = listing(1, 2.0, 10);
        let farm = Waypoint::new(33.51, -86.81);

        let pickup = create_pickup(&l, farm);

        assert_eq!(pickup.listing_id, l.id);
        assert_eq!(pickup.phase, PickupPhase::ToFarm);
        assert!(pickup.driver_pos.is_none());
        assert_eq!(pickup.farm_location, farm);
    }

    #[test]
    fn directory_prefers_known_farms_and_remembers_new_ones() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut farms = FarmDirectory::default();
        let known = Waypoint::new(33.6, -86.7);
        farms.register("Known Farm", known);

        assert_eq!(farms.resolve("Known Farm", &WAREHOUSE, &mut rng), known);

        let first = farms.resolve("New Farm", &WAREHOUSE, &mut rng);
        let second = farms.resolve("New Farm", &WAREHOUSE, &mut rng);
        assert_eq!(first, second);
        assert!((first.lat - WAREHOUSE.lat).abs() <= NEARBY_SPREAD);
        assert_eq!(farms.len(), 2);
    }
}
