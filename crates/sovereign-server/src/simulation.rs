//! Scheduled background tickers.
//!
//! Each ticker is a scheduled reducer driven by its timer table; the row math
//! lives in `sovereign_logic::ticks`. Only the module itself may invoke them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spacetimedb::{reducer, ReducerContext, Table};

use sovereign_logic::events::ActiveEvent;
use sovereign_logic::ticks::{plan_event_tick, produce, regen_port, roll_fighters};

use crate::reducers::now_secs;
use crate::store::{event_model, event_row, planet_model, planet_row, port_model, port_row};
use crate::tables::*;

fn require_scheduler(ctx: &ReducerContext, ticker: &str) -> Result<(), String> {
    if ctx.sender != ctx.identity() {
        return Err(format!("{ticker} can only be run by the scheduler"));
    }
    Ok(())
}

fn seeded_rng(ctx: &ReducerContext) -> StdRng {
    StdRng::seed_from_u64(ctx.rng().gen())
}

// ============================================================================
// ECONOMY
// ============================================================================

/// Restock every port toward its base quantity.
#[reducer]
pub fn port_tick(ctx: &ReducerContext, _timer: PortTickTimer) -> Result<(), String> {
    require_scheduler(ctx, "port_tick")?;
    let mut updated = 0;
    for row in ctx.db.port().iter() {
        let mut port = match port_model(&row) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("port tick skipped sector {}: {e}", row.sector_id);
                continue;
            }
        };
        if regen_port(&mut port) {
            ctx.db.port().sector_id().update(port_row(&port));
            updated += 1;
        }
    }
    log::debug!("port tick: {updated} ports restocked");
    Ok(())
}

/// Add one cycle of production to every planet.
#[reducer]
pub fn planet_tick(ctx: &ReducerContext, _timer: PlanetTickTimer) -> Result<(), String> {
    require_scheduler(ctx, "planet_tick")?;
    let mut updated = 0;
    for row in ctx.db.planet().iter() {
        let mut planet = planet_model(&row);
        if produce(&mut planet) {
            ctx.db.planet().id().update(planet_row(&planet));
            updated += 1;
        }
    }
    log::debug!("planet tick: {updated} planets produced");
    Ok(())
}

// ============================================================================
// WORLD
// ============================================================================

/// Expire finished events and maybe spawn a new one.
#[reducer]
pub fn event_tick(ctx: &ReducerContext, _timer: EventTickTimer) -> Result<(), String> {
    require_scheduler(ctx, "event_tick")?;
    let now = now_secs(ctx);

    let mut events: Vec<ActiveEvent> = Vec::new();
    for row in ctx.db.sector_event().iter() {
        match event_model(&row) {
            Ok(e) => events.push(e),
            Err(e) => {
                log::warn!("event tick dropping unreadable event {}: {e}", row.id);
                ctx.db.sector_event().id().delete(row.id);
            }
        }
    }
    let mut sectors: Vec<u32> = ctx.db.sector().iter().map(|s| s.id).collect();
    sectors.sort_unstable();
    let mut port_sectors: Vec<u32> = ctx.db.port().iter().map(|p| p.sector_id).collect();
    port_sectors.sort_unstable();

    let tick = plan_event_tick(&mut seeded_rng(ctx), &events, &sectors, &port_sectors, now);
    for id in &tick.expired {
        ctx.db.sector_event().id().delete(*id);
    }
    if let Some(event) = tick.spawned {
        let row = ctx.db.sector_event().insert(event_row(&event));
        log::info!(
            "event {} ({}) started in sector {}",
            row.id,
            row.kind,
            row.sector_id
        );
    }
    log::debug!("event tick: {} expired", tick.expired.len());
    Ok(())
}

/// Re-roll the standing fighter force of every protectorate.
#[reducer]
pub fn protectorate_tick(
    ctx: &ReducerContext,
    _timer: ProtectorateTickTimer,
) -> Result<(), String> {
    require_scheduler(ctx, "protectorate_tick")?;
    let mut rng = seeded_rng(ctx);
    let mut updated = 0;
    for sector in ctx.db.sector().iter().filter(|s| s.is_protectorate) {
        ctx.db.sector().id().update(Sector {
            protectorate_fighters: roll_fighters(&mut rng),
            ..sector
        });
        updated += 1;
    }
    log::debug!("protectorate tick: {updated} sectors re-rolled");
    Ok(())
}
