//! `GameStore` over the reducer context.
//!
//! A reducer is already one serializable transaction, so the "for update"
//! loads are plain reads. Returning `Err` from the reducer rolls every write
//! here back.

use std::collections::HashSet;

use spacetimedb::{ReducerContext, Table};

use sovereign_logic::commodity::{Commodity, Holds};
use sovereign_logic::events::{ActiveEvent, EventKind};
use sovereign_logic::intel::{sort_newest_first, PortIntel as Intel};
use sovereign_logic::model::{self as m, CorpId, CorpRole, LogKind, PlanetId, PlayerId, SectorId};
use sovereign_logic::ships::ShipClass;
use sovereign_logic::store::{log_ids_to_prune, GameStore, StoreError, StoreResult};

use crate::tables::*;

/// A stored enum code that does not parse.
fn corrupt(entity: &str, id: impl std::fmt::Display, field: &str) -> StoreError {
    StoreError::Conflict(format!("{entity} {id} has an invalid {field}"))
}

// ============================================================================
// ROW CONVERSIONS
// ============================================================================

fn owner_from_columns(player: Option<u64>, corp: Option<u64>) -> m::Owner {
    match (player, corp) {
        (_, Some(corp)) => m::Owner::Corp {
            corp,
            founder: player.unwrap_or_default(),
        },
        (Some(id), None) => m::Owner::Player(id),
        (None, None) => m::Owner::Unowned,
    }
}

fn stock(
    sector: SectorId,
    mode: &str,
    qty: u32,
    base_qty: u32,
    base_price: u32,
    regen: u32,
) -> StoreResult<m::PortStock> {
    Ok(m::PortStock {
        mode: m::TradeMode::parse(mode).ok_or_else(|| corrupt("port", sector, "mode"))?,
        qty,
        base_qty,
        base_price,
        regen,
    })
}

pub(crate) fn port_model(row: &Port) -> StoreResult<m::Port> {
    let id = row.sector_id;
    Ok(m::Port {
        sector_id: id,
        ore: stock(
            id,
            &row.ore_mode,
            row.ore_qty,
            row.ore_base_qty,
            row.ore_base_price,
            row.ore_regen,
        )?,
        organics: stock(
            id,
            &row.organics_mode,
            row.organics_qty,
            row.organics_base_qty,
            row.organics_base_price,
            row.organics_regen,
        )?,
        equipment: stock(
            id,
            &row.equipment_mode,
            row.equipment_qty,
            row.equipment_base_qty,
            row.equipment_base_price,
            row.equipment_regen,
        )?,
    })
}

pub(crate) fn port_row(port: &m::Port) -> Port {
    Port {
        sector_id: port.sector_id,
        ore_mode: port.ore.mode.as_str().to_string(),
        ore_qty: port.ore.qty,
        ore_base_qty: port.ore.base_qty,
        ore_base_price: port.ore.base_price,
        ore_regen: port.ore.regen,
        organics_mode: port.organics.mode.as_str().to_string(),
        organics_qty: port.organics.qty,
        organics_base_qty: port.organics.base_qty,
        organics_base_price: port.organics.base_price,
        organics_regen: port.organics.regen,
        equipment_mode: port.equipment.mode.as_str().to_string(),
        equipment_qty: port.equipment.qty,
        equipment_base_qty: port.equipment.base_qty,
        equipment_base_price: port.equipment.base_price,
        equipment_regen: port.equipment.regen,
    }
}

pub(crate) fn planet_model(row: &Planet) -> m::Planet {
    m::Planet {
        id: row.id,
        sector_id: row.sector_id,
        name: row.name.clone(),
        owner: owner_from_columns(row.owner_player_id, row.owner_corp_id),
        production: Holds::new(row.prod_ore, row.prod_organics, row.prod_equipment),
        storage: Holds::new(row.ore, row.organics, row.equipment),
        storage_max: row.storage_max,
        citadel_level: row.citadel_level,
    }
}

pub(crate) fn planet_row(planet: &m::Planet) -> Planet {
    Planet {
        id: planet.id,
        sector_id: planet.sector_id,
        name: planet.name.clone(),
        owner_player_id: planet.owner.player(),
        owner_corp_id: planet.owner.corp(),
        prod_ore: planet.production.ore,
        prod_organics: planet.production.organics,
        prod_equipment: planet.production.equipment,
        ore: planet.storage.ore,
        organics: planet.storage.organics,
        equipment: planet.storage.equipment,
        storage_max: planet.storage_max,
        citadel_level: planet.citadel_level,
    }
}

fn minefield_model(row: &Minefield) -> m::Minefield {
    m::Minefield {
        id: row.id,
        sector_id: row.sector_id,
        owner: owner_from_columns(row.owner_player_id, row.owner_corp_id),
        qty: row.qty,
        created_at: row.created_at,
    }
}

fn minefield_row(field: &m::Minefield) -> Minefield {
    Minefield {
        id: field.id,
        sector_id: field.sector_id,
        owner_player_id: field.owner.player(),
        owner_corp_id: field.owner.corp(),
        qty: field.qty,
        created_at: field.created_at,
    }
}

pub(crate) fn event_model(row: &SectorEvent) -> StoreResult<ActiveEvent> {
    let scope = if row.commodity.is_empty() {
        None
    } else {
        let commodity = Commodity::parse(&row.commodity)
            .ok_or_else(|| corrupt("event", row.id, "commodity"))?;
        Some(commodity)
    };
    Ok(ActiveEvent {
        id: row.id,
        kind: EventKind::parse(&row.kind).ok_or_else(|| corrupt("event", row.id, "kind"))?,
        sector_id: row.sector_id,
        scope,
        price_percent: row.price_percent,
        severity: row.severity,
        title: row.title.clone(),
        description: row.description.clone(),
        started_at: row.started_at,
        ends_at: row.ends_at,
    })
}

pub(crate) fn event_row(event: &ActiveEvent) -> SectorEvent {
    SectorEvent {
        id: event.id,
        kind: event.kind.as_str().to_string(),
        sector_id: event.sector_id,
        commodity: event.scope.map(|c| c.as_str().to_string()).unwrap_or_default(),
        price_percent: event.price_percent,
        severity: event.severity,
        title: event.title.clone(),
        description: event.description.clone(),
        started_at: event.started_at,
        ends_at: event.ends_at,
    }
}

fn sector_model(row: Sector) -> m::Sector {
    m::Sector {
        id: row.id,
        name: row.name,
        is_protectorate: row.is_protectorate,
        protectorate_fighters: row.protectorate_fighters,
    }
}

fn member_model(row: &CorpMember) -> StoreResult<m::CorpMember> {
    Ok(m::CorpMember {
        corp_id: row.corp_id,
        player_id: row.player_id,
        role: CorpRole::parse(&row.role).ok_or_else(|| corp_role_error(row))?,
        joined_at: row.joined_at,
    })
}

fn corp_role_error(row: &CorpMember) -> StoreError {
    corrupt("corp member", row.player_id, "role")
}

fn corp_model(row: Corporation) -> m::Corporation {
    m::Corporation {
        id: row.id,
        name: row.name,
        bank: row.bank,
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct DbStore<'a> {
    ctx: &'a ReducerContext,
}

impl<'a> DbStore<'a> {
    pub fn new(ctx: &'a ReducerContext) -> Self {
        Self { ctx }
    }

    fn player_row(&self, id: PlayerId) -> StoreResult<Player> {
        self.ctx
            .db
            .player()
            .id()
            .find(id)
            .ok_or_else(|| StoreError::not_found("player", id))
    }

    fn membership(&self, player: PlayerId) -> StoreResult<Option<m::CorpMembership>> {
        let Some(member) = self.ctx.db.corp_member().player_id().find(player) else {
            return Ok(None);
        };
        let Some(corp) = self.ctx.db.corporation().id().find(member.corp_id) else {
            return Ok(None);
        };
        let role = CorpRole::parse(&member.role).ok_or_else(|| corp_role_error(&member))?;
        Ok(Some(m::CorpMembership {
            corp_id: corp.id,
            name: corp.name,
            role,
            bank: corp.bank,
        }))
    }
}

impl GameStore for DbStore<'_> {
    fn load_player_for_update(&mut self, id: PlayerId) -> StoreResult<m::Player> {
        let row = self.player_row(id)?;
        let season_name = self
            .ctx
            .db
            .season()
            .id()
            .find(row.season_id)
            .map(|s| s.name)
            .unwrap_or_else(|| format!("Season {}", row.season_id));
        Ok(m::Player {
            id: row.id,
            username: row.username.clone(),
            is_admin: row.is_admin,
            must_change_password: row.must_change_password,
            credits: row.credits,
            xp: row.xp,
            level: row.level,
            ship: ShipClass::parse(&row.ship_type)
                .ok_or_else(|| corrupt("player", row.id, "ship type"))?,
            cargo_upgrades: row.cargo_upgrades,
            turn_upgrades: row.turn_upgrades,
            turns: row.turns,
            turns_max: row.turns_max,
            sector_id: row.sector_id,
            cargo_max: row.cargo_max,
            cargo: Holds::new(row.cargo_ore, row.cargo_organics, row.cargo_equipment),
            last_turn_regen: row.last_turn_regen,
            season_id: row.season_id,
            season_name,
            corp: self.membership(id)?,
        })
    }

    fn save_player(&mut self, player: &m::Player) -> StoreResult<()> {
        let row = self.player_row(player.id)?;
        self.ctx.db.player().id().update(Player {
            credits: player.credits,
            xp: player.xp,
            level: player.level,
            ship_type: player.ship.as_str().to_string(),
            cargo_upgrades: player.cargo_upgrades,
            turn_upgrades: player.turn_upgrades,
            turns: player.turns,
            turns_max: player.turns_max,
            sector_id: player.sector_id,
            cargo_max: player.cargo_max,
            cargo_ore: player.cargo.ore,
            cargo_organics: player.cargo.organics,
            cargo_equipment: player.cargo.equipment,
            last_turn_regen: player.last_turn_regen,
            ..row
        });
        Ok(())
    }

    fn username(&self, id: PlayerId) -> StoreResult<Option<String>> {
        Ok(self.ctx.db.player().id().find(id).map(|p| p.username))
    }

    // ---- sectors ----

    fn sector(&self, id: SectorId) -> StoreResult<Option<m::Sector>> {
        Ok(self.ctx.db.sector().id().find(id).map(sector_model))
    }

    fn warps_from(&self, id: SectorId) -> StoreResult<Vec<SectorId>> {
        let mut out: Vec<SectorId> = self
            .ctx
            .db
            .warp()
            .iter()
            .filter(|w| w.from_sector == id)
            .map(|w| w.to_sector)
            .collect();
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    fn warps_among(&self, sectors: &[SectorId]) -> StoreResult<Vec<(SectorId, SectorId)>> {
        let set: HashSet<SectorId> = sectors.iter().copied().collect();
        Ok(self
            .ctx
            .db
            .warp()
            .iter()
            .filter(|w| set.contains(&w.from_sector) && set.contains(&w.to_sector))
            .map(|w| (w.from_sector, w.to_sector))
            .collect())
    }

    fn mark_discovered(&mut self, player: PlayerId, sector: SectorId) -> StoreResult<()> {
        let known = self
            .ctx
            .db
            .discovery()
            .iter()
            .any(|d| d.player_id == player && d.sector_id == sector);
        if !known {
            self.ctx.db.discovery().insert(Discovery {
                id: 0,
                player_id: player,
                sector_id: sector,
            });
        }
        Ok(())
    }

    fn discovered_sectors(&self, player: PlayerId) -> StoreResult<Vec<SectorId>> {
        let mut out: Vec<SectorId> = self
            .ctx
            .db
            .discovery()
            .iter()
            .filter(|d| d.player_id == player)
            .map(|d| d.sector_id)
            .collect();
        out.sort_unstable();
        Ok(out)
    }

    // ---- ports ----

    fn port(&self, sector: SectorId) -> StoreResult<Option<m::Port>> {
        self.ctx
            .db
            .port()
            .sector_id()
            .find(sector)
            .map(|row| port_model(&row))
            .transpose()
    }

    fn save_port(&mut self, port: &m::Port) -> StoreResult<()> {
        if self.ctx.db.port().sector_id().find(port.sector_id).is_none() {
            return Err(StoreError::not_found("port", port.sector_id));
        }
        self.ctx.db.port().sector_id().update(port_row(port));
        Ok(())
    }

    // ---- planets ----

    fn planet_in_sector(&self, sector: SectorId) -> StoreResult<Option<m::Planet>> {
        Ok(self
            .ctx
            .db
            .planet()
            .sector_id()
            .find(sector)
            .map(|row| planet_model(&row)))
    }

    fn insert_planet(&mut self, planet: m::Planet) -> StoreResult<PlanetId> {
        let row = self
            .ctx
            .db
            .planet()
            .try_insert(planet_row(&m::Planet { id: 0, ..planet }))
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        Ok(row.id)
    }

    fn save_planet(&mut self, planet: &m::Planet) -> StoreResult<()> {
        if self.ctx.db.planet().id().find(planet.id).is_none() {
            return Err(StoreError::not_found("planet", planet.id));
        }
        self.ctx.db.planet().id().update(planet_row(planet));
        Ok(())
    }

    fn count_corp_planets(&self, corp: CorpId) -> StoreResult<u32> {
        let n = self
            .ctx
            .db
            .planet()
            .iter()
            .filter(|p| p.owner_corp_id == Some(corp))
            .count();
        Ok(u32::try_from(n).unwrap_or(u32::MAX))
    }

    // ---- corporations ----

    fn corp(&self, id: CorpId) -> StoreResult<Option<m::Corporation>> {
        Ok(self.ctx.db.corporation().id().find(id).map(corp_model))
    }

    fn find_corp_by_name(&self, name: &str) -> StoreResult<Option<m::Corporation>> {
        let wanted = name.to_lowercase();
        Ok(self
            .ctx
            .db
            .corporation()
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
            .map(corp_model))
    }

    fn insert_corp(&mut self, name: &str, now: i64) -> StoreResult<CorpId> {
        let row = self
            .ctx
            .db
            .corporation()
            .try_insert(Corporation {
                id: 0,
                name: name.to_string(),
                bank: 0,
                created_at: now,
            })
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        Ok(row.id)
    }

    fn save_corp(&mut self, corp: &m::Corporation) -> StoreResult<()> {
        let row = self
            .ctx
            .db
            .corporation()
            .id()
            .find(corp.id)
            .ok_or_else(|| StoreError::not_found("corporation", corp.id))?;
        self.ctx.db.corporation().id().update(Corporation {
            name: corp.name.clone(),
            bank: corp.bank,
            ..row
        });
        Ok(())
    }

    fn delete_corp(&mut self, id: CorpId) -> StoreResult<()> {
        let members: Vec<u64> = self
            .ctx
            .db
            .corp_member()
            .iter()
            .filter(|row| row.corp_id == id)
            .map(|row| row.id)
            .collect();
        for member in members {
            self.ctx.db.corp_member().id().delete(member);
        }
        self.ctx.db.corporation().id().delete(id);
        Ok(())
    }

    fn corp_members(&self, corp: CorpId) -> StoreResult<Vec<m::CorpMember>> {
        let mut rows: Vec<CorpMember> = self
            .ctx
            .db
            .corp_member()
            .iter()
            .filter(|row| row.corp_id == corp)
            .collect();
        rows.sort_by_key(|row| (row.joined_at, row.id));
        rows.iter().map(member_model).collect()
    }

    fn insert_corp_member(&mut self, member: m::CorpMember) -> StoreResult<()> {
        self.ctx
            .db
            .corp_member()
            .try_insert(CorpMember {
                id: 0,
                player_id: member.player_id,
                corp_id: member.corp_id,
                role: member.role.as_str().to_string(),
                joined_at: member.joined_at,
            })
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        Ok(())
    }

    fn set_corp_role(&mut self, corp: CorpId, player: PlayerId, role: CorpRole) -> StoreResult<()> {
        let row = self
            .ctx
            .db
            .corp_member()
            .player_id()
            .find(player)
            .filter(|row| row.corp_id == corp)
            .ok_or_else(|| StoreError::not_found("corp member", player))?;
        self.ctx.db.corp_member().id().update(CorpMember {
            role: role.as_str().to_string(),
            ..row
        });
        Ok(())
    }

    fn delete_corp_member(&mut self, corp: CorpId, player: PlayerId) -> StoreResult<()> {
        if let Some(row) = self.ctx.db.corp_member().player_id().find(player) {
            if row.corp_id == corp {
                self.ctx.db.corp_member().id().delete(row.id);
            }
        }
        Ok(())
    }

    fn insert_corp_message(
        &mut self,
        corp: CorpId,
        player: PlayerId,
        text: &str,
        now: i64,
    ) -> StoreResult<()> {
        self.ctx.db.corp_message().insert(CorpMessage {
            id: 0,
            corp_id: corp,
            player_id: player,
            text: text.to_string(),
            at: now,
        });
        Ok(())
    }

    // ---- mines ----

    fn minefields_in_sector(&self, sector: SectorId) -> StoreResult<Vec<m::Minefield>> {
        Ok(self
            .ctx
            .db
            .minefield()
            .iter()
            .filter(|f| f.sector_id == sector)
            .map(|f| minefield_model(&f))
            .collect())
    }

    fn insert_minefield(&mut self, field: m::Minefield) -> StoreResult<u64> {
        let row = self
            .ctx
            .db
            .minefield()
            .insert(minefield_row(&m::Minefield { id: 0, ..field }));
        Ok(row.id)
    }

    fn save_minefield(&mut self, field: &m::Minefield) -> StoreResult<()> {
        if self.ctx.db.minefield().id().find(field.id).is_none() {
            return Err(StoreError::not_found("minefield", field.id));
        }
        self.ctx.db.minefield().id().update(minefield_row(field));
        Ok(())
    }

    fn delete_minefield(&mut self, id: u64) -> StoreResult<()> {
        self.ctx.db.minefield().id().delete(id);
        Ok(())
    }

    // ---- events ----

    fn active_event(&self, sector: SectorId, now: i64) -> StoreResult<Option<ActiveEvent>> {
        self.ctx
            .db
            .sector_event()
            .iter()
            .filter(|e| e.sector_id == sector && e.ends_at > now)
            .min_by_key(|e| e.ends_at)
            .map(|e| event_model(&e))
            .transpose()
    }

    fn active_events(&self, now: i64) -> StoreResult<Vec<ActiveEvent>> {
        let mut events = self
            .ctx
            .db
            .sector_event()
            .iter()
            .filter(|e| e.ends_at > now)
            .map(|e| event_model(&e))
            .collect::<StoreResult<Vec<_>>>()?;
        events.sort_by_key(|e| (e.ends_at, e.id));
        Ok(events)
    }

    // ---- intel ----

    fn upsert_intel(&mut self, player: PlayerId, intel: &Intel) -> StoreResult<()> {
        let payload =
            serde_json::to_string(intel).map_err(|e| StoreError::Conflict(e.to_string()))?;
        let existing = self
            .ctx
            .db
            .port_intel()
            .iter()
            .find(|i| i.player_id == player && i.sector_id == intel.sector_id);
        match existing {
            Some(row) => {
                self.ctx.db.port_intel().id().update(PortIntel {
                    scanned_at: intel.scanned_at,
                    payload,
                    ..row
                });
            }
            None => {
                self.ctx.db.port_intel().insert(PortIntel {
                    id: 0,
                    player_id: player,
                    sector_id: intel.sector_id,
                    scanned_at: intel.scanned_at,
                    payload,
                });
            }
        }
        Ok(())
    }

    fn delete_intel(&mut self, player: PlayerId, sector: SectorId) -> StoreResult<()> {
        let stale: Vec<u64> = self
            .ctx
            .db
            .port_intel()
            .iter()
            .filter(|i| i.player_id == player && i.sector_id == sector)
            .map(|i| i.id)
            .collect();
        for id in stale {
            self.ctx.db.port_intel().id().delete(id);
        }
        Ok(())
    }

    fn intel_for_player(&self, player: PlayerId) -> StoreResult<Vec<Intel>> {
        let mut list = self
            .ctx
            .db
            .port_intel()
            .iter()
            .filter(|i| i.player_id == player)
            .map(|i| {
                serde_json::from_str::<Intel>(&i.payload)
                    .map_err(|_| corrupt("intel", i.id, "payload"))
            })
            .collect::<StoreResult<Vec<_>>>()?;
        sort_newest_first(&mut list);
        Ok(list)
    }

    // ---- logs ----

    fn insert_log(
        &mut self,
        player: PlayerId,
        kind: LogKind,
        message: &str,
        now: i64,
    ) -> StoreResult<()> {
        self.ctx.db.game_log().insert(GameLog {
            id: 0,
            player_id: player,
            kind: kind.as_str().to_string(),
            message: message.to_string(),
            at: now,
        });
        Ok(())
    }

    fn recent_logs(&self, player: PlayerId, limit: usize) -> StoreResult<Vec<m::LogEntry>> {
        let mut rows: Vec<GameLog> = self
            .ctx
            .db
            .game_log()
            .iter()
            .filter(|l| l.player_id == player)
            .collect();
        rows.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit);
        rows.into_iter()
            .map(|l| {
                Ok(m::LogEntry {
                    at: l.at,
                    kind: LogKind::parse(&l.kind).ok_or_else(|| corrupt("log", l.id, "kind"))?,
                    message: l.message,
                })
            })
            .collect()
    }

    fn prune_logs(&mut self, player: PlayerId, keep: usize) -> StoreResult<usize> {
        let ids: Vec<u64> = self
            .ctx
            .db
            .game_log()
            .iter()
            .filter(|l| l.player_id == player)
            .map(|l| l.id)
            .collect();
        let stale = log_ids_to_prune(ids, keep);
        for id in &stale {
            self.ctx.db.game_log().id().delete(*id);
        }
        Ok(stale.len())
    }

    // ---- seasons ----

    fn season(&self, id: u32) -> StoreResult<Option<m::Season>> {
        Ok(self.ctx.db.season().id().find(id).map(|s| m::Season {
            id: s.id,
            name: s.name,
            started_at: s.started_at,
        }))
    }

    fn rankings(&self, season: u32, limit: usize) -> StoreResult<Vec<m::RankingRow>> {
        let mut rows: Vec<m::RankingRow> = self
            .ctx
            .db
            .player()
            .iter()
            .filter(|p| p.season_id == season)
            .map(|p| m::RankingRow {
                corp_name: self
                    .ctx
                    .db
                    .corp_member()
                    .player_id()
                    .find(p.id)
                    .and_then(|cm| self.ctx.db.corporation().id().find(cm.corp_id))
                    .map(|c| c.name),
                username: p.username,
                credits: p.credits,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.credits
                .cmp(&a.credits)
                .then_with(|| a.username.cmp(&b.username))
        });
        rows.truncate(limit);
        Ok(rows)
    }
}
