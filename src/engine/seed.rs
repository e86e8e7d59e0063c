use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::engine::factory::FarmDirectory;
use crate::engine::pricing::round2;
use crate::models::listing::{Category, Listing, ListingStatus, Unit};
use crate::models::waypoint::Waypoint;

struct SeedProduce {
    title: &'static str,
    category: Category,
    base_price: f64,
    available_qty: u32,
    unit: Unit,
    image: &'static str,
}

/// Offsets are relative to the warehouse.
const SEED_FARMS: [(&str, f64, f64); 3] = [
    ("Sunny Acres", 0.008, -0.006),
    ("Green Valley", -0.007, 0.009),
    ("Red Barn Organics", 0.004, 0.011),
];

const SEED_PRODUCE: [SeedProduce; 6] = [
    SeedProduce {
        title: "Heirloom Tomatoes",
        category: Category::Vegetables,
        base_price: 3.5,
        available_qty: 40,
        unit: Unit::Lb,
        image: "/heirloom-tomatoes.png",
    },
    SeedProduce {
        title: "Strawberries",
        category: Category::Fruits,
        base_price: 4.0,
        available_qty: 30,
        unit: Unit::Lb,
        image: "/strawberries.png",
    },
    SeedProduce {
        title: "Sweet Basil",
        category: Category::Herbs,
        base_price: 2.25,
        available_qty: 25,
        unit: Unit::Bunch,
        image: "/basil.png",
    },
    SeedProduce {
        title: "Rainbow Carrots",
        category: Category::Vegetables,
        base_price: 2.75,
        available_qty: 35,
        unit: Unit::Bunch,
        image: "/rainbow-carrots.png",
    },
    SeedProduce {
        title: "Peaches",
        category: Category::Fruits,
        base_price: 1.5,
        available_qty: 60,
        unit: Unit::Each,
        image: "/peaches.png",
    },
    SeedProduce {
        title: "Stone-ground Cornmeal",
        category: Category::Grains,
        base_price: 0.6,
        available_qty: 80,
        unit: Unit::Oz,
        image: "/cornmeal.png",
    },
];

/// Registers the seeded farms at fixed locations around `warehouse`.
pub fn seed_farms(directory: &mut FarmDirectory, warehouse: &Waypoint) {
    for (name, dlat, dlng) in SEED_FARMS {
        directory.register(name, Waypoint::new(warehouse.lat + dlat, warehouse.lng + dlng));
    }
}

/// Demo catalogue: prices jittered to 90-130% of base, farms assigned round
/// robin. Everything starts available.
pub fn seed_listings(rng: &mut impl Rng) -> Vec<Listing> {
    SEED_PRODUCE
        .iter()
        .enumerate()
        .map(|(i, produce)| Listing {
            id: Uuid::now_v7(),
            title: produce.title.to_string(),
            category: produce.category,
            price_per_unit: round2(produce.base_price * rng.gen_range(0.9..1.3)),
            available_qty: produce.available_qty,
            unit: produce.unit,
            farm: SEED_FARMS[i % SEED_FARMS.len()].0.to_string(),
            status: ListingStatus::Available,
            image: Some(produce.image.to_string()),
            created_at: Utc::now(),
        })
        .collect()
}
