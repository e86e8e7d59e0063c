use crate::models::order::{LineItem, OrderTotals};

const CUSTOMER_MARKUP_RATE: f64 = 0.05;
const DELIVERY_BASE_FEE: f64 = 4.0;
const DELIVERY_PER_STOP_FEE: f64 = 1.25;
const DELIVERY_STOPS: f64 = 6.0;

pub fn compute_totals(items: &[LineItem]) -> OrderTotals {
    let subtotal: f64 = items.iter().map(LineItem::subtotal).sum();
    let customer_markup = subtotal * CUSTOMER_MARKUP_RATE;
    let delivery_fee = delivery_fee();

    OrderTotals {
        subtotal,
        customer_markup,
        delivery_fee,
        total: subtotal + customer_markup + delivery_fee,
    }
}

pub fn delivery_fee() -> f64 {
    DELIVERY_BASE_FEE + DELIVERY_PER_STOP_FEE * DELIVERY_STOPS
}

/// Rounds to whole cents.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
