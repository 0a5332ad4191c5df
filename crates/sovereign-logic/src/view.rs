//! Response payloads: player state, sector view and the command response.

use serde::{Deserialize, Serialize};

use crate::commodity::{Commodity, Holds};
use crate::events::ActiveEvent;
use crate::model::{LogEntry, Owner, Planet, Player, PlayerId, Port, SectorId};
use crate::pricing::stock_price;
use crate::progression::{rank_name, xp_for_level, MAX_LEVEL};
use crate::store::{GameStore, StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub username: String,
    pub is_admin: bool,
    pub must_change_password: bool,
    pub credits: i64,
    pub turns: u32,
    pub turns_max: u32,
    pub sector_id: SectorId,
    pub cargo_max: u32,
    pub cargo_ore: u32,
    pub cargo_organics: u32,
    pub cargo_equipment: u32,
    pub ship_type: String,
    pub cargo_upgrades: u32,
    pub turn_upgrades: u32,
    pub xp: i64,
    pub level: u32,
    pub rank: String,
    pub next_level_xp: i64,
    pub season_id: u32,
    pub season_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corp_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corp_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corp_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corp_credits: Option<i64>,
}

impl From<&Player> for PlayerState {
    fn from(p: &Player) -> Self {
        let level = p.level.max(1);
        Self {
            id: p.id,
            username: p.username.clone(),
            is_admin: p.is_admin,
            must_change_password: p.must_change_password,
            credits: p.credits,
            turns: p.turns,
            turns_max: p.turns_max,
            sector_id: p.sector_id,
            cargo_max: p.cargo_max,
            cargo_ore: p.cargo.ore,
            cargo_organics: p.cargo.organics,
            cargo_equipment: p.cargo.equipment,
            ship_type: p.ship.as_str().to_string(),
            cargo_upgrades: p.cargo_upgrades,
            turn_upgrades: p.turn_upgrades,
            xp: p.xp,
            level,
            rank: rank_name(level).to_string(),
            next_level_xp: xp_for_level((level + 1).min(MAX_LEVEL)),
            season_id: p.season_id,
            season_name: p.season_name.clone(),
            corp_id: p.corp.as_ref().map(|c| c.corp_id),
            corp_name: p.corp.as_ref().map(|c| c.name.clone()),
            corp_role: p.corp.as_ref().map(|c| c.role.as_str().to_string()),
            corp_credits: p.corp.as_ref().map(|c| c.bank),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockView {
    pub mode: String,
    pub qty: u32,
    pub base_qty: u32,
    /// Live price, including any active event modifier.
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortView {
    pub ore: StockView,
    pub organics: StockView,
    pub equipment: StockView,
}

impl PortView {
    pub fn new(port: &Port, event: Option<&ActiveEvent>) -> Self {
        let stock = |c: Commodity| {
            let s = port.stock(c);
            StockView {
                mode: s.mode.as_str().to_string(),
                qty: s.qty,
                base_qty: s.base_qty,
                price: stock_price(s, c, event),
            }
        };
        Self {
            ore: stock(Commodity::Ore),
            organics: stock(Commodity::Organics),
            equipment: stock(Commodity::Equipment),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetView {
    pub id: u64,
    pub name: String,
    /// `PLAYER` or `CORP`; absent when unclaimed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub production: Holds,
    pub storage: Holds,
    pub storage_max: u32,
    pub citadel_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub kind: String,
    pub sector_id: SectorId,
    pub commodity: String,
    pub price_percent: i32,
    pub severity: u32,
    pub title: String,
    pub description: String,
    pub ends_at: i64,
}

impl From<&ActiveEvent> for EventView {
    fn from(e: &ActiveEvent) -> Self {
        Self {
            kind: e.kind.as_str().to_string(),
            sector_id: e.sector_id,
            commodity: e.scope_label().to_string(),
            price_percent: e.price_percent,
            severity: e.severity,
            title: e.title.clone(),
            description: e.description.clone(),
            ends_at: e.ends_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorView {
    pub id: SectorId,
    pub name: String,
    pub warps: Vec<SectorId>,
    pub is_protectorate: bool,
    pub protectorate_fighters: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<PortView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<PlanetView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventView>,
    pub mines: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub state: PlayerState,
    pub sector: SectorView,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogEntry>,
}

fn planet_view<S: GameStore + ?Sized>(store: &S, planet: &Planet) -> StoreResult<PlanetView> {
    let (owner_type, owner) = match planet.owner {
        Owner::Unowned => (None, None),
        Owner::Player(id) => (Some("PLAYER"), store.username(id)?),
        Owner::Corp { corp, .. } => (Some("CORP"), store.corp(corp)?.map(|c| c.name)),
    };
    Ok(PlanetView {
        id: planet.id,
        name: planet.name.clone(),
        owner_type: owner_type.map(str::to_string),
        owner,
        production: planet.production,
        storage: planet.storage,
        storage_max: planet.storage_max,
        citadel_level: planet.citadel_level,
    })
}

/// Everything a player sees in `sector_id`, read inside the current transaction.
pub fn load_sector_view<S: GameStore + ?Sized>(
    store: &S,
    sector_id: SectorId,
    now: i64,
) -> StoreResult<SectorView> {
    let sector = store
        .sector(sector_id)?
        .ok_or_else(|| StoreError::not_found("sector", sector_id))?;
    let mut warps = store.warps_from(sector_id)?;
    warps.sort_unstable();
    let event = store.active_event(sector_id, now)?;
    let port = store
        .port(sector_id)?
        .map(|p| PortView::new(&p, event.as_ref()));
    let planet = match store.planet_in_sector(sector_id)? {
        Some(p) => Some(planet_view(store, &p)?),
        None => None,
    };
    Ok(SectorView {
        id: sector.id,
        name: sector.name,
        warps,
        is_protectorate: sector.is_protectorate,
        protectorate_fighters: sector.protectorate_fighters,
        port,
        planet,
        event: event.as_ref().map(EventView::from),
        mines: store.mine_total(sector_id)?,
    })
}
