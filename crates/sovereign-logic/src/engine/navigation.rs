//! SCAN and MOVE, including the entry effects of a move.

use super::mine::apply_field_changes;
use super::{EngineResult, ErrorCode, Outcome};
use crate::combat::{consume, strike_damage, strike_order, trigger_count};
use crate::intel::PortIntel;
use crate::model::{LogKind, Player, PlayerId, SectorId};
use crate::store::{GameStore, StoreError};

pub(super) fn scan<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    now: i64,
) -> EngineResult<Outcome> {
    let sector_id = player.sector_id;
    store.mark_discovered(player.id, sector_id)?;
    capture_intel(store, player.id, sector_id, now)?;
    Ok(Outcome::logged(
        LogKind::Action,
        format!("Scan complete for sector {sector_id}."),
    ))
}

fn capture_intel<S: GameStore + ?Sized>(
    store: &mut S,
    player_id: PlayerId,
    sector_id: SectorId,
    now: i64,
) -> EngineResult<()> {
    let Some(port) = store.port(sector_id)? else {
        store.delete_intel(player_id, sector_id)?;
        return Ok(());
    };
    let sector = store
        .sector(sector_id)?
        .ok_or_else(|| StoreError::not_found("sector", sector_id))?;
    let event = store.active_event(sector_id, now)?;
    let intel = PortIntel::capture(&port, &sector.name, event.as_ref(), now);
    store.upsert_intel(player_id, &intel)?;
    Ok(())
}

pub(super) fn move_to<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    to: i64,
    now: i64,
) -> EngineResult<Outcome> {
    let invalid = || Outcome::reject(ErrorCode::InvalidMove, "Invalid destination sector.");
    let Ok(dest) = SectorId::try_from(to) else {
        return Ok(invalid());
    };
    if dest < 1 {
        return Ok(invalid());
    }
    if player.is_admin {
        if store.sector(dest)?.is_none() {
            return Ok(invalid());
        }
    } else if !store.has_warp(player.sector_id, dest)? {
        return Ok(Outcome::reject(
            ErrorCode::InvalidMove,
            "No warp to that sector.",
        ));
    }

    player.sector_id = dest;
    store.mark_discovered(player.id, dest)?;
    let mut message = format!("Moved to sector {dest}.");
    let mut logs = vec![(LogKind::Action, message.clone())];

    if let Some(event) = store.active_event(dest, now)? {
        let effect = event.entry_effect(player.credits, now);
        player.credits -= effect.credits_lost;
        message.push('\n');
        message.push_str(&effect.message);
        logs.push((effect.log_kind, effect.message));
    }

    if let Some(strike) = mine_strike(store, player)? {
        message.push('\n');
        message.push_str(&strike);
        logs.push((LogKind::Combat, strike));
    }

    Ok(Outcome::Done { message, logs })
}

/// Detonate hostile mines in the player's new sector, oldest fields first.
fn mine_strike<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
) -> EngineResult<Option<String>> {
    let fields = store.minefields_in_sector(player.sector_id)?;
    let hostile = strike_order(&fields, player.id, player.corp_id());
    let total: u32 = hostile.iter().fold(0, |acc, f| acc.saturating_add(f.qty));
    let triggered = trigger_count(total);
    if triggered == 0 {
        return Ok(None);
    }

    let (detonated, changes) = consume(&hostile, triggered);
    apply_field_changes(store, &hostile, changes)?;

    let damage = strike_damage(detonated, player.credits);
    player.credits -= damage;
    log::debug!(
        "player {} hit {detonated} mines in sector {}",
        player.id,
        player.sector_id
    );
    Ok(Some(format!(
        "Mine strike! {detonated} mines detonated. Repairs cost {damage} credits."
    )))
}
