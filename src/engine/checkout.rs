use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::Order;
use crate::models::pickup::Pickup;
use crate::state::AppState;

/// Places the shopper's cart as an order. The cart is cleared only once the
/// order exists; an empty cart yields `None` and changes nothing.
///
/// The only await is the market lock, taken before the cart is read. Cart
/// edits also hold the market lock, so none can slip in between reading the
/// cart and clearing it.
pub async fn checkout(state: &AppState, shopper_id: Uuid) -> Option<Order> {
    let mut market = state.market.write().await;

    let cart = state
        .carts
        .get(&shopper_id)
        .map(|cart| cart.value().clone())
        .unwrap_or_default();

    if cart.is_empty() {
        info!(shopper_id = %shopper_id, "checkout with empty cart ignored");
        return None;
    }

    let shopper_location = state.users.get(&shopper_id).and_then(|user| user.location);

    let order = market.place_order(&cart, shopper_location)?;
    state.carts.remove(&shopper_id);
    drop(market);

    state.metrics.orders_placed_total.inc();
    state.metrics.active_deliveries.inc();

    Some(order)
}

pub async fn request_pickup(state: &AppState, listing_id: Uuid) -> Result<Pickup, AppError> {
    let pickup = state.market.write().await.request_pickup(listing_id)?;

    state.metrics.pickups_requested_total.inc();
    state.metrics.active_pickups.inc();

    Ok(pickup)
}
