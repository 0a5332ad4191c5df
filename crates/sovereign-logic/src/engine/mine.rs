//! MINE INFO, DEPLOY and SWEEP.

use super::{EngineResult, ErrorCode, Outcome};
use crate::combat::{consume, sweep_order, FieldChange, MAX_DEPLOY_PER_COMMAND, SWEEP_CAPACITY};
use crate::command::MineCommand;
use crate::model::{LogKind, Minefield, Owner, Player};
use crate::store::{GameStore, StoreError};

pub(super) fn run<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    command: &MineCommand,
    now: i64,
) -> EngineResult<Outcome> {
    match command {
        MineCommand::Info => Ok(Outcome::logged(
            LogKind::System,
            "MINE DEPLOY {qty} (uses equipment cargo) | MINE SWEEP",
        )),
        MineCommand::Deploy { quantity } => deploy(store, player, *quantity, now),
        MineCommand::Sweep => sweep(store, player),
        MineCommand::Unknown => Ok(Outcome::reject(
            ErrorCode::UnknownSubcommand,
            "Unknown MINE subcommand.",
        )),
    }
}

/// Persist the result of [`consume`] over `fields`.
pub(super) fn apply_field_changes<S: GameStore + ?Sized>(
    store: &mut S,
    fields: &[Minefield],
    changes: Vec<FieldChange>,
) -> EngineResult<()> {
    for change in changes {
        match change {
            FieldChange::Remove { id } => store.delete_minefield(id)?,
            FieldChange::Shrink { id, qty } => {
                let field = fields
                    .iter()
                    .find(|f| f.id == id)
                    .ok_or_else(|| StoreError::not_found("minefield", id))?;
                store.save_minefield(&Minefield {
                    qty,
                    ..field.clone()
                })?;
            }
        }
    }
    Ok(())
}

fn deploy<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    quantity: i64,
    now: i64,
) -> EngineResult<Outcome> {
    if quantity < 1 {
        return Ok(Outcome::reject(
            ErrorCode::InvalidQty,
            "Deploy quantity must be at least 1.",
        ));
    }
    if quantity > i64::from(MAX_DEPLOY_PER_COMMAND) {
        return Ok(Outcome::reject(
            ErrorCode::InvalidQty,
            format!("Deploy quantity too large (max {MAX_DEPLOY_PER_COMMAND} per command)."),
        ));
    }
    let qty = u32::try_from(quantity).unwrap_or(MAX_DEPLOY_PER_COMMAND);
    let sector_id = player.sector_id;
    let protectorate = store
        .sector(sector_id)?
        .ok_or_else(|| StoreError::not_found("sector", sector_id))?
        .is_protectorate;
    if protectorate {
        return Ok(Outcome::reject(
            ErrorCode::ProtectoratePeace,
            "The Galactic Protectorate forbids mine deployment in Protectorate sectors.",
        ));
    }
    if player.cargo.equipment < qty {
        return Ok(Outcome::reject(
            ErrorCode::InsufficientEquipment,
            "Not enough equipment cargo to deploy mines.",
        ));
    }

    player.cargo.equipment -= qty;
    let owner = Owner::claimed_by(player.id, player.corp_id());
    let existing = store
        .minefields_in_sector(sector_id)?
        .into_iter()
        .find(|f| f.owner.player() == Some(player.id));
    let total = match existing {
        Some(mut field) => {
            field.qty = field.qty.saturating_add(qty);
            field.owner = owner;
            store.save_minefield(&field)?;
            field.qty
        }
        None => {
            store.insert_minefield(Minefield {
                id: 0,
                sector_id,
                owner,
                qty,
                created_at: now,
            })?;
            qty
        }
    };
    Ok(Outcome::logged(
        LogKind::Action,
        format!("Deployed {qty} mines in sector {sector_id}. Your minefield here is now {total}."),
    ))
}

fn sweep<S: GameStore + ?Sized>(store: &mut S, player: &Player) -> EngineResult<Outcome> {
    let fields = store.minefields_in_sector(player.sector_id)?;
    let hostile = sweep_order(&fields, player.id, player.corp_id());
    let (removed, changes) = consume(&hostile, SWEEP_CAPACITY);
    if removed == 0 {
        return Ok(Outcome::logged(LogKind::System, "No hostile mines detected."));
    }
    apply_field_changes(store, &hostile, changes)?;
    Ok(Outcome::logged(
        LogKind::Action,
        format!(
            "Swept {removed} hostile mines in sector {}.",
            player.sector_id
        ),
    ))
}
