//! PLANET INFO, COLONIZE, LOAD, UNLOAD and UPGRADE_CITADEL.

use super::{EngineResult, ErrorCode, Outcome};
use crate::command::PlanetCommand;
use crate::commodity::{Commodity, Holds};
use crate::model::{LogKind, Owner, Planet, Player};
use crate::rules::{
    citadel_upgrade_cost, validate_planet_name, CITADEL_MAX_LEVEL, COLONIZE_COST,
    MAX_TRANSFER_QTY,
};
use crate::store::GameStore;

/// Production and storage of a newly founded planet.
const NEW_PLANET_PRODUCTION: Holds = Holds::new(10, 6, 3);
const NEW_PLANET_STORAGE_MAX: u32 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    Load,
    Unload,
}

pub(super) fn run<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    command: &PlanetCommand,
) -> EngineResult<Outcome> {
    match command {
        PlanetCommand::Info => info(store, player),
        PlanetCommand::Colonize { name } => colonize(store, player, name),
        PlanetCommand::Load {
            commodity,
            quantity,
        } => transfer(store, player, Transfer::Load, *commodity, *quantity),
        PlanetCommand::Unload {
            commodity,
            quantity,
        } => transfer(store, player, Transfer::Unload, *commodity, *quantity),
        PlanetCommand::UpgradeCitadel => upgrade_citadel(store, player),
        PlanetCommand::Unknown => Ok(Outcome::reject(
            ErrorCode::UnknownSubcommand,
            "Unknown PLANET subcommand.",
        )),
    }
}

fn has_access(player: &Player, planet: &Planet) -> bool {
    planet.owner.grants_access(player.id, player.corp_id())
}

fn owner_label(player: &Player, planet: &Planet) -> String {
    match planet.owner {
        Owner::Unowned => "Unclaimed".to_string(),
        owner if has_access(player, planet) => match (owner.corp(), player.corp.as_ref()) {
            (Some(owner_corp), Some(membership)) if membership.corp_id == owner_corp => {
                format!("Your corp ({})", membership.name)
            }
            _ => "You".to_string(),
        },
        Owner::Corp { .. } => "Another corporation".to_string(),
        Owner::Player(_) => "Another player".to_string(),
    }
}

fn info<S: GameStore + ?Sized>(store: &mut S, player: &Player) -> EngineResult<Outcome> {
    let Some(planet) = store.planet_in_sector(player.sector_id)? else {
        return Ok(Outcome::logged(LogKind::System, "No planet in this sector."));
    };
    let p = planet.production;
    let s = planet.storage;
    let max = planet.storage_max;
    let text = [
        format!("Planet: {}", planet.name),
        format!("Owner: {}", owner_label(player, &planet)),
        format!("Citadel: {}", planet.citadel_level),
        format!(
            "Production/tick: Ore {}, Org {}, Eq {}",
            p.ore, p.organics, p.equipment
        ),
        format!(
            "Storage: Ore {}/{max}, Org {}/{max}, Eq {}/{max}",
            s.ore, s.organics, s.equipment
        ),
    ]
    .join("\n");
    Ok(Outcome::logged(LogKind::System, text))
}

fn colonize<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    raw_name: &str,
) -> EngineResult<Outcome> {
    let raw_name = if raw_name.trim().is_empty() {
        format!("Planet {}", player.sector_id)
    } else {
        raw_name.to_string()
    };
    let name = match validate_planet_name(&raw_name) {
        Ok(name) => name,
        Err(e) => return Ok(Outcome::reject(ErrorCode::InvalidName, e.to_string())),
    };

    let existing = store.load_planet_for_update(player.sector_id)?;
    if let Some(planet) = &existing {
        if planet.owner.is_owned() {
            let message = if has_access(player, planet) {
                "You already control this planet."
            } else {
                "This planet is already controlled."
            };
            return Ok(Outcome::reject(ErrorCode::AlreadyOwned, message));
        }
    }
    if player.credits < COLONIZE_COST {
        return Ok(Outcome::reject(
            ErrorCode::InsufficientCredits,
            format!("Colonization requires {COLONIZE_COST} credits."),
        ));
    }

    player.credits -= COLONIZE_COST;
    let owner = Owner::claimed_by(player.id, player.corp_id());
    let message = match existing {
        Some(mut planet) => {
            planet.name = name;
            planet.owner = owner;
            store.save_planet(&planet)?;
            format!(
                "Colonized existing planet '{}' for {COLONIZE_COST} credits.",
                planet.name
            )
        }
        None => {
            store.insert_planet(Planet {
                id: 0,
                sector_id: player.sector_id,
                name: name.clone(),
                owner,
                production: NEW_PLANET_PRODUCTION,
                storage: Holds::default(),
                storage_max: NEW_PLANET_STORAGE_MAX,
                citadel_level: 0,
            })?;
            format!("Established new planet '{name}' for {COLONIZE_COST} credits.")
        }
    };
    log::info!("player {} colonized sector {}", player.id, player.sector_id);
    Ok(Outcome::logged(LogKind::Action, message))
}

/// Load the planet in the player's sector if the player may use it.
fn accessible_planet<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
) -> EngineResult<Result<Planet, Outcome>> {
    let Some(planet) = store.load_planet_for_update(player.sector_id)? else {
        return Ok(Err(Outcome::reject(
            ErrorCode::NoPlanet,
            "No planet in this sector.",
        )));
    };
    if !has_access(player, &planet) {
        return Ok(Err(Outcome::reject(
            ErrorCode::NoAccess,
            "You do not have access to this planet.",
        )));
    }
    Ok(Ok(planet))
}

fn transfer<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    direction: Transfer,
    commodity: Option<Commodity>,
    quantity: i64,
) -> EngineResult<Outcome> {
    let Some(commodity) = commodity else {
        return Ok(Outcome::reject(
            ErrorCode::InvalidCommodity,
            "Commodity must be ORE, ORGANICS, or EQUIPMENT.",
        ));
    };
    if !(1..=MAX_TRANSFER_QTY).contains(&quantity) {
        return Ok(Outcome::reject(
            ErrorCode::InvalidQty,
            format!("Quantity must be between 1 and {MAX_TRANSFER_QTY}."),
        ));
    }
    let qty = u32::try_from(quantity).unwrap_or(u32::MAX);
    let mut planet = match accessible_planet(store, player)? {
        Ok(planet) => planet,
        Err(rejected) => return Ok(rejected),
    };
    let amount = commodity.quantifier();
    let noun = commodity.noun();

    let message = match direction {
        Transfer::Load => {
            if qty > player.free_cargo() {
                return Ok(Outcome::reject(
                    ErrorCode::NoCargoSpace,
                    "Not enough cargo space.",
                ));
            }
            if planet.storage.get(commodity) < qty {
                return Ok(Outcome::reject(
                    ErrorCode::InsufficientStored,
                    format!("Planet does not have that {amount} {noun} stored."),
                ));
            }
            *planet.storage.get_mut(commodity) -= qty;
            *player.cargo.get_mut(commodity) += qty;
            format!("Loaded {qty} {noun} from {}.", planet.name)
        }
        Transfer::Unload => {
            if player.cargo.get(commodity) < qty {
                return Ok(Outcome::reject(
                    ErrorCode::InsufficientCargo,
                    format!("You do not have that {amount} {noun}."),
                ));
            }
            let stored = u64::from(planet.storage.get(commodity));
            if stored + u64::from(qty) > u64::from(planet.storage_max) {
                return Ok(Outcome::reject(
                    ErrorCode::StorageFull,
                    format!("Planet {noun} storage is full."),
                ));
            }
            *player.cargo.get_mut(commodity) -= qty;
            *planet.storage.get_mut(commodity) += qty;
            format!("Unloaded {qty} {noun} to {}.", planet.name)
        }
    };

    store.save_planet(&planet)?;
    Ok(Outcome::logged(LogKind::Action, message))
}

fn upgrade_citadel<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
) -> EngineResult<Outcome> {
    let mut planet = match accessible_planet(store, player)? {
        Ok(planet) => planet,
        Err(rejected) => return Ok(rejected),
    };
    if planet.citadel_level >= CITADEL_MAX_LEVEL {
        return Ok(Outcome::reject(
            ErrorCode::MaxLevel,
            "Citadel is already at max level.",
        ));
    }
    let next = planet.citadel_level + 1;
    let cost = citadel_upgrade_cost(next);
    if player.credits < cost {
        return Ok(Outcome::reject(
            ErrorCode::InsufficientCredits,
            format!("Citadel upgrade requires {cost} credits."),
        ));
    }

    player.credits -= cost;
    planet.citadel_level = next;
    store.save_planet(&planet)?;
    Ok(Outcome::logged(
        LogKind::Action,
        format!("Citadel upgraded to level {next} for {cost} credits."),
    ))
}
