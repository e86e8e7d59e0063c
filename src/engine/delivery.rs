use tracing::info;
use uuid::Uuid;

use crate::geo::{STEP_SIZE, advance_toward};
use crate::models::order::{Order, OrderStatus};

/// Moves one order's driver a single step toward its drop-off.
///
/// Returns `true` when this step delivered the order. Delivered orders are
/// left untouched.
pub fn step_order(order: &mut Order) -> bool {
    if order.status.is_terminal() {
        return false;
    }

    let next = advance_toward(&order.driver_pos, &order.dropoff, STEP_SIZE);
    if next.arrived {
        order.driver_pos = order.dropoff;
        order.status = OrderStatus::Delivered;
        return true;
    }

    order.driver_pos = next.position;
    order.status = order.status.max(OrderStatus::OutForDelivery);
    false
}

/// Runs the delivery pass over every order, returning the ids delivered on
/// this tick.
pub fn advance_orders(orders: &mut [Order]) -> Vec<Uuid> {
    let mut delivered = Vec::new();

    for order in orders.iter_mut() {
        if step_order(order) {
            info!(order_id = %order.id, "order delivered");
            delivered.push(order.id);
        }
    }

    delivered
}
