//! SHIPYARD INFO, BUY, SELL and UPGRADE. Only protectorate sectors have one.
//!
//! Nothing here touches the store beyond the availability check: every
//! change lands on the player row, which the engine saves.

use super::{EngineResult, ErrorCode, Outcome};
use crate::command::ShipyardCommand;
use crate::model::{LogKind, Player};
use crate::ships::{
    cargo_upgrade_cost, turns_upgrade_cost, ShipClass, ShipSpec, CARGO_PER_UPGRADE, CATALOG,
    MAX_CARGO_UPGRADES, MAX_TURN_UPGRADES, TURNS_PER_UPGRADE,
};
use crate::store::{GameStore, StoreError};

pub(super) fn run<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    command: &ShipyardCommand,
) -> EngineResult<Outcome> {
    let sector = store
        .sector(player.sector_id)?
        .ok_or_else(|| StoreError::not_found("sector", player.sector_id))?;
    if !sector.is_protectorate {
        return Ok(Outcome::reject(
            ErrorCode::NoShipyard,
            "No shipyard is available in this sector. Shipyards are found in Protectorate sectors.",
        ));
    }

    Ok(match command {
        ShipyardCommand::Info => Outcome::logged(LogKind::System, info(player)),
        ShipyardCommand::Buy { ship } if ship.is_empty() => Outcome::reject(
            ErrorCode::InvalidShip,
            "SHIPYARD BUY requires a ship type (e.g., TRADER).",
        ),
        ShipyardCommand::Buy { ship } => buy(player, ship),
        ShipyardCommand::Sell => sell(player),
        ShipyardCommand::Upgrade { target } if target.is_empty() => Outcome::reject(
            ErrorCode::InvalidUpgrade,
            "SHIPYARD UPGRADE requires CARGO or TURNS.",
        ),
        ShipyardCommand::Upgrade { target } => upgrade(player, target),
        ShipyardCommand::Unknown => Outcome::reject(
            ErrorCode::UnknownSubcommand,
            "Unknown SHIPYARD subcommand.",
        ),
    })
}

fn info(player: &Player) -> String {
    let mut lines = vec![
        "SHIPYARD commands: SHIPYARD BUY {type} | SHIPYARD SELL | SHIPYARD UPGRADE {CARGO|TURNS}"
            .to_string(),
        format!(
            "Current ship: {} (CargoMax={}, TurnsMax={})",
            player.ship.as_str(),
            player.cargo_max,
            player.turns_max
        ),
        format!(
            "Upgrades: Cargo +{} ({}/{MAX_CARGO_UPGRADES}), Turns +{} ({}/{MAX_TURN_UPGRADES})",
            player.cargo_upgrades * CARGO_PER_UPGRADE,
            player.cargo_upgrades,
            player.turn_upgrades * TURNS_PER_UPGRADE,
            player.turn_upgrades
        ),
        "Available ships:".to_string(),
    ];
    lines.extend(CATALOG.iter().map(|s| {
        format!(
            "- {}: CargoMax={} TurnsMax={} Price={}",
            s.class.as_str(),
            s.cargo_max,
            s.turns_max,
            s.price
        )
    }));
    lines.push(format!(
        "Next cargo upgrade cost: {}",
        cargo_upgrade_cost(player.cargo_upgrades)
    ));
    lines.push(format!(
        "Next turns upgrade cost: {}",
        turns_upgrade_cost(player.turn_upgrades)
    ));
    lines.join("\n")
}

/// Swap hulls: reset upgrades and take the new ship's caps.
fn refit(player: &mut Player, spec: ShipSpec) {
    player.ship = spec.class;
    player.cargo_upgrades = 0;
    player.turn_upgrades = 0;
    player.cargo_max = spec.cargo_max;
    player.turns_max = spec.turns_max;
    player.turns = player.turns.min(player.turns_max);
}

fn buy(player: &mut Player, ship: &str) -> Outcome {
    let Some(class) = ShipClass::parse(ship) else {
        return Outcome::reject(ErrorCode::InvalidShip, "Unknown ship type.");
    };
    if class == player.ship {
        return Outcome::reject(ErrorCode::InvalidShip, "You already own this ship type.");
    }
    let spec = class.spec();
    if player.credits < spec.price {
        return Outcome::reject(
            ErrorCode::InsufficientCredits,
            "Insufficient credits to buy that ship.",
        );
    }
    if player.cargo.total() > spec.cargo_max {
        return Outcome::reject(
            ErrorCode::CargoTooLarge,
            "Your current cargo exceeds the capacity of that ship. Reduce cargo before buying.",
        );
    }

    player.credits -= spec.price;
    refit(player, spec);
    Outcome::logged(
        LogKind::Action,
        format!(
            "Purchased {} for {} credits. CargoMax={}, TurnsMax={}.",
            class.as_str(),
            spec.price,
            player.cargo_max,
            player.turns_max
        ),
    )
}

fn sell(player: &mut Player) -> Outcome {
    let current = player.ship;
    if current == ShipClass::Scout {
        return Outcome::reject(ErrorCode::InvalidShip, "You cannot sell your starter SCOUT.");
    }
    let scout = ShipClass::Scout.spec();
    if player.cargo.total() > scout.cargo_max {
        return Outcome::reject(
            ErrorCode::CargoTooLarge,
            "Your cargo exceeds SCOUT capacity. Reduce cargo before selling.",
        );
    }

    let refund = current.resale_value();
    player.credits += refund;
    refit(player, scout);
    Outcome::logged(
        LogKind::Action,
        format!(
            "Sold {} for {refund} credits. You are now flying a SCOUT.",
            current.as_str()
        ),
    )
}

fn upgrade(player: &mut Player, target: &str) -> Outcome {
    match target {
        "CARGO" => {
            if player.cargo_upgrades >= MAX_CARGO_UPGRADES {
                return Outcome::reject(
                    ErrorCode::MaxUpgrades,
                    "Cargo upgrades are already at maximum.",
                );
            }
            let cost = cargo_upgrade_cost(player.cargo_upgrades);
            if player.credits < cost {
                return Outcome::reject(
                    ErrorCode::InsufficientCredits,
                    "Insufficient credits for cargo upgrade.",
                );
            }
            player.credits -= cost;
            player.cargo_upgrades += 1;
            player.cargo_max += CARGO_PER_UPGRADE;
            Outcome::logged(
                LogKind::Action,
                format!(
                    "Cargo upgraded (+{CARGO_PER_UPGRADE}). New CargoMax={}. Cost={cost}.",
                    player.cargo_max
                ),
            )
        }
        "TURNS" => {
            if player.turn_upgrades >= MAX_TURN_UPGRADES {
                return Outcome::reject(
                    ErrorCode::MaxUpgrades,
                    "Turns upgrades are already at maximum.",
                );
            }
            let cost = turns_upgrade_cost(player.turn_upgrades);
            if player.credits < cost {
                return Outcome::reject(
                    ErrorCode::InsufficientCredits,
                    "Insufficient credits for turns upgrade.",
                );
            }
            player.credits -= cost;
            player.turn_upgrades += 1;
            player.turns_max += TURNS_PER_UPGRADE;
            Outcome::logged(
                LogKind::Action,
                format!(
                    "Turns capacity upgraded (+{TURNS_PER_UPGRADE}). New TurnsMax={}. Cost={cost}.",
                    player.turns_max
                ),
            )
        }
        _ => Outcome::reject(
            ErrorCode::InvalidUpgrade,
            "Unknown upgrade type. Use CARGO or TURNS.",
        ),
    }
}
