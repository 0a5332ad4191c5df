//! Scarcity-based port pricing.
//!
//! A port's unit price rises linearly from `base_price` when fully stocked to
//! twice that when empty. Sector events scale the base price first, then the
//! scarcity term is applied on top.

use crate::commodity::Commodity;
use crate::events::ActiveEvent;
use crate::model::{Port, PortStock};

/// Lowest and highest event percent accepted when pricing.
pub const MIN_PRICE_PERCENT: i32 = 10;
pub const MAX_PRICE_PERCENT: i32 = 300;

/// Unit price at the given inventory level, never below 1.
pub fn price_per_unit(base_price: i64, base_qty: i64, qty: i64) -> i64 {
    let base_price = base_price.max(1);
    if base_qty <= 0 {
        return base_price;
    }
    let qty = qty.clamp(0, base_qty);
    let scarcity = (base_qty - qty) as f64 / base_qty as f64;
    let price = (base_price as f64 * (1.0 + scarcity)).round() as i64;
    price.max(1)
}

/// Unit price with an event percent applied to the base price.
///
/// `percent` is clamped to [`MIN_PRICE_PERCENT`, `MAX_PRICE_PERCENT`].
pub fn price_per_unit_with_percent(base_price: i64, base_qty: i64, qty: i64, percent: i32) -> i64 {
    let percent = percent.clamp(MIN_PRICE_PERCENT, MAX_PRICE_PERCENT);
    let base_price = if percent != 100 {
        (base_price as f64 * f64::from(percent) / 100.0).round() as i64
    } else {
        base_price
    };
    price_per_unit(base_price, base_qty, qty)
}

/// Live price for one port commodity under an optional sector event.
pub fn stock_price(stock: &PortStock, commodity: Commodity, event: Option<&ActiveEvent>) -> i64 {
    let percent = event.map_or(100, |e| e.price_percent_for(commodity));
    price_per_unit_with_percent(
        i64::from(stock.base_price),
        i64::from(stock.base_qty),
        i64::from(stock.qty),
        percent,
    )
}

/// Live prices for all three commodities of a port, in [`Commodity::ALL`] order.
pub fn port_prices(port: &Port, event: Option<&ActiveEvent>) -> [i64; 3] {
    Commodity::ALL.map(|c| stock_price(port.stock(c), c, event))
}
