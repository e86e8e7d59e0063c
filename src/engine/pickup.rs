use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use crate::geo::{STEP_SIZE, advance_toward};
use crate::models::listing::{Listing, ListingStatus};
use crate::models::pickup::{Pickup, PickupPhase};
use crate::models::waypoint::Waypoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupStep {
    Moving,
    ReachedFarm,
    Completed,
}

/// Moves one pickup driver a single step along its current leg.
pub fn step_pickup(pickup: &mut Pickup, warehouse: &Waypoint) -> PickupStep {
    let target = match pickup.phase {
        PickupPhase::ToFarm => pickup.farm_location,
        PickupPhase::ToWarehouse => *warehouse,
    };
    let start = pickup.driver_pos.unwrap_or(*warehouse);

    let next = advance_toward(&start, &target, STEP_SIZE);
    if !next.arrived {
        pickup.driver_pos = Some(next.position);
        return PickupStep::Moving;
    }

    match pickup.phase {
        PickupPhase::ToFarm => {
            pickup.driver_pos = Some(target);
            pickup.phase = PickupPhase::ToWarehouse;
            PickupStep::ReachedFarm
        }
        PickupPhase::ToWarehouse => {
            pickup.driver_pos = Some(target);
            PickupStep::Completed
        }
    }
}

/// Runs the pickup pass: steps every pickup, drops the ones that made it back
/// to the warehouse, and returns the listing ids they were carrying.
///
/// Listings are not touched here; see [`release_listings`].
pub fn advance_pickups(pickups: &mut Vec<Pickup>, warehouse: &Waypoint) -> Vec<Uuid> {
    let mut completed = Vec::new();

    pickups.retain_mut(|pickup| match step_pickup(pickup, warehouse) {
        PickupStep::Moving => true,
        PickupStep::ReachedFarm => {
            info!(pickup_id = %pickup.id, farm = %pickup.farm, "pickup reached farm");
            true
        }
        PickupStep::Completed => {
            info!(
                pickup_id = %pickup.id,
                listing_id = %pickup.listing_id,
                "pickup returned to warehouse"
            );
            completed.push(pickup.listing_id);
            false
        }
    });

    completed
}

/// Flips every listing carried in by this tick's pickups to available.
/// Returns the ids whose status actually changed.
pub fn release_listings(listings: &mut [Listing], completed: &[Uuid]) -> Vec<Uuid> {
    if completed.is_empty() {
        return Vec::new();
    }

    let completed: HashSet<&Uuid> = completed.iter().collect();
    let mut released = Vec::new();

    for listing in listings.iter_mut().filter(|l| completed.contains(&l.id)) {
        if listing.status != ListingStatus::Available {
            listing.status = ListingStatus::Available;
            released.push(listing.id);
        }
    }

    released
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{PickupStep, advance_pickups, release_listings, step_pickup};
    use crate::geo::{ARRIVAL_THRESHOLD, STEP_SIZE, distance};
    use crate::models::listing::{Category, Listing, ListingStatus, Unit};
    use crate::models::pickup::{Pickup, PickupPhase};
    use crate::models::waypoint::Waypoint;

    const WAREHOUSE: Waypoint = Waypoint::new(33.52, -86.8);

    fn pickup(listing_seed: u128, farm_location: Waypoint) -> Pickup {
        Pickup {
            id: Uuid::now_v7(),
            listing_id: Uuid::from_u128(listing_seed),
            farm: "Red Barn".to_string(),
            farm_location,
            driver_pos: None,
            phase: PickupPhase::ToFarm,
        }
    }

    fn pending(id_seed: u128) -> Listing {
        Listing {
            id: Uuid::from_u128(id_seed),
            title: "Carrots".to_string(),
            category: Category::Vegetables,
            price_per_unit: 2.5,
            available_qty: 10,
            unit: Unit::Bunch,
            farm: "Red Barn".to_string(),
            status: ListingStatus::Pending,
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn first_step_departs_from_the_warehouse() {
        let mut p = pickup(1, Waypoint::new(33.53, -86.8));

        assert_eq!(step_pickup(&mut p, &WAREHOUSE), PickupStep::Moving);

        let pos = p.driver_pos.unwrap();
        assert!((distance(&WAREHOUSE, &pos) - STEP_SIZE).abs() < 1e-9);
    }

    #[test]
    fn round_trip_visits_farm_then_warehouse_exactly_once() {
        let farm = Waypoint::new(33.53, -86.79);
        let d = distance(&WAREHOUSE, &farm);
        let lower = 2 * ((d - ARRIVAL_THRESHOLD) / STEP_SIZE).ceil() as usize;
        let upper = 2 * ((d / STEP_SIZE).ceil() as usize + 1);
        let mut pickups = vec![pickup(1, farm)];

        let mut phases = Vec::new();
        let mut ticks = 0;
        let mut completed = Vec::new();
        while completed.is_empty() {
            phases.push(pickups[0].phase);
            completed = advance_pickups(&mut pickups, &WAREHOUSE);
            ticks += 1;
            assert!(ticks <= upper, "round trip exceeded {upper} ticks");
        }

        assert!(ticks >= lower);
        assert!(pickups.is_empty());
        assert_eq!(completed, vec![Uuid::from_u128(1)]);

        let turn = phases
            .iter()
            .position(|p| *p == PickupPhase::ToWarehouse)
            .unwrap();
        assert!(turn > 0);
        assert!(phases[..turn].iter().all(|p| *p == PickupPhase::ToFarm));
        assert!(phases[turn..].iter().all(|p| *p == PickupPhase::ToWarehouse));
    }

    #[test]
    fn arriving_at_farm_snaps_position_and_turns_around() {
        let farm = Waypoint::new(33.5205, -86.8);
        let mut p = pickup(1, farm);

        assert_eq!(step_pickup(&mut p, &WAREHOUSE), PickupStep::ReachedFarm);
        assert_eq!(p.driver_pos, Some(farm));
        assert_eq!(p.phase, PickupPhase::ToWarehouse);

        assert_eq!(step_pickup(&mut p, &WAREHOUSE), PickupStep::Completed);
    }

    #[test]
    fn release_only_touches_completed_listings() {
        let mut listings = vec![pending(1), pending(2), pending(3)];

        let released = release_listings(&mut listings, &[Uuid::from_u128(2)]);

        assert_eq!(released, vec![Uuid::from_u128(2)]);
        assert_eq!(listings[0].status, ListingStatus::Pending);
        assert_eq!(listings[1].status, ListingStatus::Available);
        assert_eq!(listings[2].status, ListingStatus::Pending);
    }

    #[test]
    fn release_ignores_unknown_and_already_available_listings() {
        let mut listings = vec![pending(1)];
        listings[0].status = ListingStatus::Available;

        let released = release_listings(&mut listings, &[Uuid::from_u128(1), Uuid::from_u128(9)]);
        assert!(released.is_empty());
    }
}
