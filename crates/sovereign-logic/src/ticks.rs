//! Background ticker math: port regen, planet production, protectorate
//! fighters and the event lifecycle.
//!
//! Each function works on one row (or one list) and returns the new state;
//! the stores apply them in bulk without any per-row locking.

use rand::Rng;

use crate::commodity::Commodity;
use crate::events::{roll_event, should_spawn, ActiveEvent};
use crate::model::{Planet, Port, SectorId};

pub const PROTECTORATE_MIN_FIGHTERS: u32 = 25;
pub const PROTECTORATE_MAX_FIGHTERS: u32 = 200;

/// Restock every commodity by its regen rate, up to `base_qty`.
/// Returns true when anything changed.
pub fn regen_port(port: &mut Port) -> bool {
    let mut changed = false;
    for c in Commodity::ALL {
        let stock = port.stock_mut(c);
        let next = stock.qty.saturating_add(stock.regen).min(stock.base_qty);
        if next != stock.qty {
            stock.qty = next;
            changed = true;
        }
    }
    changed
}

/// Add one cycle of production to storage, each commodity capped at `storage_max`.
/// Returns true when anything changed.
pub fn produce(planet: &mut Planet) -> bool {
    let mut changed = false;
    for c in Commodity::ALL {
        let made = planet.production.get(c);
        let slot = planet.storage.get_mut(c);
        let next = slot.saturating_add(made).min(planet.storage_max);
        if next != *slot {
            *slot = next;
            changed = true;
        }
    }
    changed
}

/// Fresh fighter count for a protectorate sector.
pub fn roll_fighters(rng: &mut impl Rng) -> u32 {
    rng.gen_range(PROTECTORATE_MIN_FIGHTERS..=PROTECTORATE_MAX_FIGHTERS)
}

/// Outcome of one event-lifecycle tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTick {
    /// Ids of events whose window has closed.
    pub expired: Vec<u64>,
    /// New event to insert, with `id` 0.
    pub spawned: Option<ActiveEvent>,
}

/// Sweep expired events, then maybe roll a new one into a free sector.
pub fn plan_event_tick(
    rng: &mut impl Rng,
    events: &[ActiveEvent],
    sectors: &[SectorId],
    port_sectors: &[SectorId],
    now: i64,
) -> EventTick {
    let (live, dead): (Vec<&ActiveEvent>, Vec<&ActiveEvent>) =
        events.iter().partition(|e| e.is_active(now));
    let expired = dead.iter().map(|e| e.id).collect();

    let spawned = if should_spawn(live.len(), rng) {
        roll_event(
            rng,
            sectors,
            port_sectors,
            |sector| live.iter().any(|e| e.sector_id == sector),
            now,
        )
    } else {
        None
    };
    EventTick { expired, spawned }
}
