pub mod checkout;
pub mod clock;
pub mod delivery;
pub mod factory;
pub mod market;
pub mod pickup;
pub mod pricing;
pub mod projection;
pub mod seed;
