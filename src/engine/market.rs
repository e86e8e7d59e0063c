use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::delivery::advance_orders;
use crate::engine::factory::{FarmDirectory, create_order, create_pickup};
use crate::engine::pickup::{advance_pickups, release_listings};
use crate::engine::pricing::compute_totals;
use crate::engine::projection::{MapSnapshot, project};
use crate::engine::seed::{seed_farms, seed_listings};
use crate::error::AppError;
use crate::geo::random_nearby;
use crate::models::cart::{Cart, CartLine, CartSummary};
use crate::models::listing::{Listing, ListingDraft, ListingStatus};
use crate::models::order::{LineItem, Order, OrderStatus};
use crate::models::pickup::Pickup;
use crate::models::waypoint::{Warehouse, Waypoint};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub delivered: Vec<Uuid>,
    /// Listing ids of the pickups that returned to the warehouse on this tick.
    pub completed_pickups: Vec<Uuid>,
    /// Listings that went from pending to available on this tick.
    pub released_listings: Vec<Uuid>,
    pub active_deliveries: usize,
    pub active_pickups: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmerDashboard {
    pub farm: String,
    pub total_listings: usize,
    pub pending_listings: usize,
    pub active_orders: usize,
}

/// All simulated marketplace state. Listings and orders accumulate for the
/// life of the process; pickups are dropped once they complete.
pub struct Marketplace {
    warehouse: Warehouse,
    listings: Vec<Listing>,
    orders: Vec<Order>,
    pickups: Vec<Pickup>,
    farms: FarmDirectory,
    rng: StdRng,
    tick: u64,
}

impl Marketplace {
    /// `rng` drives every coordinate jitter; seed it for reproducible runs.
    pub fn new(warehouse: Warehouse, rng: StdRng) -> Self {
        Self {
            warehouse,
            listings: Vec::new(),
            orders: Vec::new(),
            pickups: Vec::new(),
            farms: FarmDirectory::default(),
            rng,
            tick: 0,
        }
    }

    pub fn seed_catalogue(&mut self) {
        seed_farms(&mut self.farms, &self.warehouse.location);
        let listings = seed_listings(&mut self.rng);
        info!(listings = listings.len(), farms = self.farms.len(), "seeded catalogue");
        self.listings.extend(listings);
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// What shoppers can browse: available listings only.
    pub fn visible_listings(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter().filter(|l| l.is_available())
    }

    pub fn listings_for_farm<'a>(&'a self, farm: &'a str) -> impl Iterator<Item = &'a Listing> {
        self.listings.iter().filter(move |l| l.farm == farm)
    }

    pub fn listing(&self, id: Uuid) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, id: Uuid) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn active_deliveries(&self) -> usize {
        self.orders.iter().filter(|o| !o.status.is_terminal()).count()
    }

    pub fn farm_location(&self, farm: &str) -> Option<Waypoint> {
        self.farms.get(farm)
    }

    /// Picks a location near the warehouse for a newly registered farm.
    pub fn register_new_farm(&mut self, farm: &str) -> Waypoint {
        let location = random_nearby(&self.warehouse.location, &mut self.rng);
        self.farms.register(farm, location);
        location
    }

    pub fn submit_listing(&mut self, farm: &str, draft: ListingDraft) -> Result<Listing, AppError> {
        let listing = draft.into_listing(farm)?;
        info!(listing_id = %listing.id, farm = %listing.farm, title = %listing.title, "listing submitted");
        self.listings.push(listing.clone());
        Ok(listing)
    }

    pub fn cart_summary(&self, cart: &Cart) -> CartSummary {
        let lines: Vec<CartLine> = cart
            .entries()
            .iter()
            .filter_map(|entry| {
                let listing = self.listing(entry.listing_id)?;
                Some(CartLine {
                    listing_id: listing.id,
                    title: listing.title.clone(),
                    unit: listing.unit,
                    price_per_unit: listing.price_per_unit,
                    qty: entry.qty,
                    farm: listing.farm.clone(),
                    line_subtotal: listing.price_per_unit * f64::from(entry.qty),
                })
            })
            .collect();

        let priced: Vec<LineItem> = lines
            .iter()
            .map(|line| LineItem {
                title: line.title.clone(),
                unit: line.unit,
                price_per_unit: line.price_per_unit,
                qty: line.qty,
                farm: line.farm.clone(),
            })
            .collect();

        CartSummary {
            total_qty: lines.iter().map(|line| line.qty).sum(),
            totals: compute_totals(&priced),
            lines,
        }
    }

    /// Turns the cart into an order and takes the purchased quantities out of
    /// stock in the same step. An empty cart places nothing.
    ///
    /// Without a known shopper location the drop-off lands somewhere near the
    /// warehouse.
    pub fn place_order(&mut self, cart: &Cart, shopper_location: Option<Waypoint>) -> Option<Order> {
        if cart.is_empty() {
            return None;
        }

        let dropoff = match shopper_location {
            Some(location) => location,
            None => random_nearby(&self.warehouse.location, &mut self.rng),
        };
        let order = create_order(cart.entries(), &self.listings, dropoff, self.warehouse.location);

        for entry in cart.entries() {
            if let Some(listing) = self.listings.iter_mut().find(|l| l.id == entry.listing_id) {
                listing.take(entry.qty);
            }
        }

        info!(
            order_id = %order.id,
            items = order.items.len(),
            total = order.totals.total,
            "order placed"
        );
        self.orders.push(order.clone());
        Some(order)
    }

    /// Sends a driver from the warehouse to collect a listing from its farm.
    pub fn request_pickup(&mut self, listing_id: Uuid) -> Result<Pickup, AppError> {
        let listing = self
            .listings
            .iter()
            .find(|l| l.id == listing_id)
            .ok_or(AppError::ListingNotFound(listing_id))?;

        if self.pickups.iter().any(|p| p.listing_id == listing_id) {
            return Err(AppError::PickupInProgress(listing_id));
        }

        let farm_location = self
            .farms
            .resolve(&listing.farm, &self.warehouse.location, &mut self.rng);
        let pickup = create_pickup(listing, farm_location);

        info!(pickup_id = %pickup.id, listing_id = %listing_id, farm = %pickup.farm, "pickup requested");
        self.pickups.push(pickup.clone());
        Ok(pickup)
    }

    /// Manual progression through the kitchen stages. Movement-driven stages
    /// belong to the clock and cannot be set here.
    pub fn set_order_status(&mut self, id: Uuid, status: OrderStatus) -> Result<Order, AppError> {
        if !matches!(status, OrderStatus::Confirmed | OrderStatus::Preparing) {
            return Err(AppError::StatusNotSettable(status));
        }

        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(AppError::OrderNotFound(id))?;

        if status < order.status {
            return Err(AppError::StatusRegression {
                order_id: id,
                current: order.status,
            });
        }

        order.status = status;
        Ok(order.clone())
    }

    pub fn farmer_dashboard(&self, farm: &str) -> FarmerDashboard {
        let total_listings = self.listings_for_farm(farm).count();
        let pending_listings = self
            .listings_for_farm(farm)
            .filter(|l| l.status == ListingStatus::Pending)
            .count();

        FarmerDashboard {
            farm: farm.to_string(),
            total_listings,
            pending_listings,
            active_orders: self.orders.len(),
        }
    }

    /// Advances every driver by one step.
    ///
    /// Orders move first, then pickups. Listings freed by returning pickups are
    /// released together after the pickup pass has finished.
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;

        let delivered = advance_orders(&mut self.orders);
        let completed = advance_pickups(&mut self.pickups, &self.warehouse.location);
        let released = release_listings(&mut self.listings, &completed);

        let report = TickReport {
            tick: self.tick,
            delivered,
            completed_pickups: completed,
            released_listings: released,
            active_deliveries: self.active_deliveries(),
            active_pickups: self.pickups.len(),
        };

        debug!(
            tick = report.tick,
            delivered = report.delivered.len(),
            completed_pickups = report.completed_pickups.len(),
            released = report.released_listings.len(),
            active_deliveries = report.active_deliveries,
            active_pickups = report.active_pickups,
            "tick"
        );

        report
    }

    pub fn snapshot(&self) -> MapSnapshot {
        project(self.tick, &self.warehouse, &self.orders, &self.pickups)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    use super::Marketplace;
    use crate::error::AppError;
    use crate::models::cart::Cart;
    use crate::models::listing::{Category, ListingDraft, ListingStatus, Unit};
    use crate::models::order::OrderStatus;
    use crate::models::pickup::PickupPhase;
    use crate::models::waypoint::{Warehouse, Waypoint};

    fn market() -> Marketplace {
        let mut market = Marketplace::new(Warehouse::default(), StdRng::seed_from_u64(11));
        market.seed_catalogue();
        market
    }

    fn draft(title: &str, qty: u32) -> ListingDraft {
        ListingDraft {
            title: title.to_string(),
            category: Category::Herbs,
            price_per_unit: 2.0,
            unit: Unit::Bunch,
            available_qty: qty,
            image: None,
        }
    }

    #[test]
    fn empty_cart_places_nothing_and_keeps_stock() {
        let mut market = market();
        let before: Vec<u32> = market.listings().iter().map(|l| l.available_qty).collect();

        assert!(market.place_order(&Cart::default(), None).is_none());

        let after: Vec<u32> = market.listings().iter().map(|l| l.available_qty).collect();
        assert!(market.orders().is_empty());
        assert_eq!(before, after);
    }

    #[test]
    fn checkout_decrements_stock_and_clamps_at_zero() {
        let mut market = market();
        let listing_id = market.submit_listing("Sunny Acres", draft("Mint", 3)).unwrap().id;
        let mut cart = Cart::default();
        cart.add(listing_id, 5);

        let order = market.place_order(&cart, Some(Waypoint::new(33.53, -86.8))).unwrap();

        assert_eq!(order.items[0].qty, 5);
        assert_eq!(market.listing(listing_id).unwrap().available_qty, 0);
        assert_eq!(market.orders().len(), 1);
    }

    #[test]
    fn checkout_without_location_drops_off_near_warehouse() {
        let mut market = market();
        let listing_id = market.listings()[0].id;
        let mut cart = Cart::default();
        cart.add(listing_id, 1);

        let order = market.place_order(&cart, None).unwrap();
        let warehouse = market.warehouse().location;

        assert!((order.dropoff.lat - warehouse.lat).abs() <= 0.01);
        assert!((order.dropoff.lng - warehouse.lng).abs() <= 0.01);
        assert_eq!(order.driver_pos, warehouse);
    }

    #[test]
    fn pending_listing_is_hidden_until_its_pickup_returns() {
        let mut market = market();
        let listing_id = market.submit_listing("Sunny Acres", draft("Thyme", 12)).unwrap().id;
        let other_pending = market.submit_listing("Sunny Acres", draft("Sage", 4)).unwrap().id;
        assert!(market.visible_listings().all(|l| l.id != listing_id));

        let pickup = market.request_pickup(listing_id).unwrap();
        assert_eq!(pickup.farm_location, market.farm_location("Sunny Acres").unwrap());

        let mut saw_return_leg = false;
        let mut released = Vec::new();
        for _ in 0..200 {
            let report = market.tick();
            if let Some(p) = market.pickups().first() {
                saw_return_leg |= p.phase == PickupPhase::ToWarehouse;
            }
            if !report.released_listings.is_empty() {
                released = report.released_listings;
                break;
            }
        }

        assert!(saw_return_leg);
        assert_eq!(released, vec![listing_id]);
        assert!(market.pickups().is_empty());
        assert_eq!(market.listing(listing_id).unwrap().status, ListingStatus::Available);
        assert_eq!(market.listing(other_pending).unwrap().status, ListingStatus::Pending);
        assert!(market.visible_listings().any(|l| l.id == listing_id));
    }

    #[test]
    fn pickup_of_available_listing_completes_without_releasing() {
        let mut market = market();
        let listing_id = market.listings()[0].id;
        market.request_pickup(listing_id).unwrap();

        let mut report = market.tick();
        for _ in 0..200 {
            if !report.completed_pickups.is_empty() {
                break;
            }
            report = market.tick();
        }

        assert_eq!(report.completed_pickups, vec![listing_id]);
        assert!(report.released_listings.is_empty());
        assert!(market.pickups().is_empty());
    }

    #[test]
    fn duplicate_pickup_is_rejected() {
        let mut market = market();
        let listing_id = market.submit_listing("Sunny Acres", draft("Dill", 2)).unwrap().id;

        market.request_pickup(listing_id).unwrap();

        assert!(matches!(
            market.request_pickup(listing_id),
            Err(AppError::PickupInProgress(id)) if id == listing_id
        ));
        assert!(matches!(
            market.request_pickup(Uuid::from_u128(404)),
            Err(AppError::ListingNotFound(_))
        ));
    }

    #[test]
    fn unknown_farm_gets_a_stable_location() {
        let mut market = market();
        let listing_id = market.submit_listing("Brand New Farm", draft("Chives", 2)).unwrap().id;

        let pickup = market.request_pickup(listing_id).unwrap();

        assert_eq!(market.farm_location("Brand New Farm"), Some(pickup.farm_location));
    }

    #[test]
    fn manual_status_is_monotonic_and_limited_to_kitchen_stages() {
        let mut market = market();
        let mut cart = Cart::default();
        cart.add(market.listings()[0].id, 1);
        let order_id = market.place_order(&cart, None).unwrap().id;

        let order = market.set_order_status(order_id, OrderStatus::Preparing).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);

        assert!(matches!(
            market.set_order_status(order_id, OrderStatus::Confirmed),
            Err(AppError::StatusRegression { current: OrderStatus::Preparing, .. })
        ));
        assert!(matches!(
            market.set_order_status(order_id, OrderStatus::Delivered),
            Err(AppError::StatusNotSettable(OrderStatus::Delivered))
        ));
    }

    #[test]
    fn tick_moves_orders_and_reports_delivery() {
        let mut market = market();
        let mut cart = Cart::default();
        cart.add(market.listings()[0].id, 1);
        let order_id = market
            .place_order(&cart, Some(Waypoint::new(33.53, -86.8)))
            .unwrap()
            .id;

        let first = market.tick();
        assert_eq!(first.tick, 1);

        let mut delivered_at = None;
        for _ in 0..100 {
            let report = market.tick();
            if report.delivered.contains(&order_id) {
                delivered_at = Some(report.tick);
                break;
            }
        }

        assert!(delivered_at.is_some());
        assert_eq!(market.active_deliveries(), 0);
        assert_eq!(market.order(order_id).unwrap().status, OrderStatus::Delivered);
    }

    #[test]
    fn snapshot_projects_routes_from_the_warehouse() {
        let mut market = market();
        let listing_id = market.submit_listing("Green Valley", draft("Oats", 9)).unwrap().id;
        market.request_pickup(listing_id).unwrap();
        market.tick();

        let snapshot = market.snapshot();

        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.pickups.len(), 1);
        assert_eq!(snapshot.pickups[0].route.from, market.warehouse().location);
        assert_eq!(snapshot.pickups[0].phase_label, "Heading to farm");
        assert!(snapshot.pickups[0].driver.is_some());
    }

    #[test]
    fn dashboard_counts_only_the_farmers_listings() {
        let mut market = market();
        market.submit_listing("Tiny Plot", draft("Parsley", 3)).unwrap();

        let dashboard = market.farmer_dashboard("Tiny Plot");

        assert_eq!(dashboard.total_listings, 1);
        assert_eq!(dashboard.pending_listings, 1);
        assert_eq!(dashboard.active_orders, 0);
    }
}
