//! Shared fixtures for unit tests.

use crate::commodity::Holds;
use crate::model::{Player, Port, PortStock, SectorId, TradeMode};
use crate::ships::ShipClass;

pub(crate) fn sample_player() -> Player {
    Player {
        id: 1,
        username: "pilot".into(),
        is_admin: false,
        must_change_password: false,
        credits: 1_000,
        xp: 0,
        level: 1,
        ship: ShipClass::Scout,
        cargo_upgrades: 0,
        turn_upgrades: 0,
        turns: 100,
        turns_max: 100,
        sector_id: 1,
        cargo_max: 30,
        cargo: Holds::default(),
        last_turn_regen: Some(0),
        season_id: 1,
        season_name: "Season 1".into(),
        corp: None,
    }
}

/// Port selling ore below its base stock and buying the other two.
pub(crate) fn sample_port(sector_id: SectorId) -> Port {
    Port {
        sector_id,
        ore: PortStock {
            mode: TradeMode::Sell,
            qty: 800,
            base_qty: 1_000,
            base_price: 10,
            regen: 20,
        },
        organics: PortStock {
            mode: TradeMode::Buy,
            qty: 300,
            base_qty: 1_000,
            base_price: 15,
            regen: 20,
        },
        equipment: PortStock {
            mode: TradeMode::Buy,
            qty: 200,
            base_qty: 600,
            base_price: 30,
            regen: 10,
        },
    }
}
