pub mod cart;
pub mod listing;
pub mod order;
pub mod pickup;
pub mod user;
pub mod waypoint;
