//! Ship catalog and shipyard upgrade pricing.

use serde::{Deserialize, Serialize};

pub const MAX_CARGO_UPGRADES: u32 = 20;
pub const MAX_TURN_UPGRADES: u32 = 10;
pub const CARGO_PER_UPGRADE: u32 = 5;
pub const TURNS_PER_UPGRADE: u32 = 10;
/// Percent of the catalog price refunded when selling a ship back.
pub const RESALE_PERCENT: i64 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipClass {
    Scout,
    Trader,
    Freighter,
    Interceptor,
}

/// Fixed stats for one hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipSpec {
    pub class: ShipClass,
    pub cargo_max: u32,
    pub turns_max: u32,
    pub price: i64,
}

pub const CATALOG: [ShipSpec; 4] = [
    ShipSpec {
        class: ShipClass::Scout,
        cargo_max: 30,
        turns_max: 100,
        price: 0,
    },
    ShipSpec {
        class: ShipClass::Trader,
        cargo_max: 60,
        turns_max: 110,
        price: 25_000,
    },
    ShipSpec {
        class: ShipClass::Freighter,
        cargo_max: 90,
        turns_max: 110,
        price: 60_000,
    },
    ShipSpec {
        class: ShipClass::Interceptor,
        cargo_max: 40,
        turns_max: 140,
        price: 50_000,
    },
];

impl ShipClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ShipClass::Scout => "SCOUT",
            ShipClass::Trader => "TRADER",
            ShipClass::Freighter => "FREIGHTER",
            ShipClass::Interceptor => "INTERCEPTOR",
        }
    }

    /// Parse an already-normalized ship code.
    pub fn parse(code: &str) -> Option<Self> {
        CATALOG
            .iter()
            .map(|s| s.class)
            .find(|c| c.as_str() == code)
    }

    pub fn spec(self) -> ShipSpec {
        match self {
            ShipClass::Scout => CATALOG[0],
            ShipClass::Trader => CATALOG[1],
            ShipClass::Freighter => CATALOG[2],
            ShipClass::Interceptor => CATALOG[3],
        }
    }

    pub fn resale_value(self) -> i64 {
        self.spec().price * RESALE_PERCENT / 100
    }
}

/// Price of the next cargo upgrade after `done` upgrades.
pub fn cargo_upgrade_cost(done: u32) -> i64 {
    2_000 * (i64::from(done) + 1)
}

/// Price of the next turns upgrade after `done` upgrades.
pub fn turns_upgrade_cost(done: u32) -> i64 {
    1_500 * (i64::from(done) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup() {
        assert_eq!(ShipClass::parse("FREIGHTER"), Some(ShipClass::Freighter));
        assert_eq!(ShipClass::parse("BATTLESHIP"), None);
        for spec in CATALOG {
            assert_eq!(spec.class.spec(), spec);
        }
    }

    #[test]
    fn resale_is_seventy_percent() {
        assert_eq!(ShipClass::Trader.resale_value(), 17_500);
        assert_eq!(ShipClass::Scout.resale_value(), 0);
    }

    #[test]
    fn upgrade_costs_scale_linearly() {
        assert_eq!(cargo_upgrade_cost(0), 2_000);
        assert_eq!(cargo_upgrade_cost(4), 10_000);
        assert_eq!(turns_upgrade_cost(0), 1_500);
        assert_eq!(turns_upgrade_cost(9), 15_000);
    }
}
