//! In-memory [`GameStore`] with snapshot transactions.
//!
//! Used by the integration tests and the simtest harness in place of the
//! SpacetimeDB module. [`MemoryStore::transaction`] clones the whole store
//! before running a closure and restores the clone if the closure fails, which
//! gives the same all-or-nothing behaviour as a reducer.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use crate::command::CommandRequest;
use crate::config::GameConfig;
use crate::engine::{execute_command, EngineError};
use crate::events::ActiveEvent;
use crate::intel::{sort_newest_first, PortIntel};
use crate::model::{
    CorpId, CorpMember, CorpMembership, CorpMessage, CorpRole, Corporation, LogEntry, LogKind,
    Minefield, Planet, PlanetId, Player, PlayerId, Port, RankingRow, Season, Sector, SectorId,
};
use crate::store::{GameStore, StoreError, StoreResult};
use crate::ticks::{plan_event_tick, produce, regen_port, roll_fighters, EventTick};
use crate::universe::Universe;
use crate::view::CommandResponse;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: BTreeMap<PlayerId, Player>,
    sectors: BTreeMap<SectorId, Sector>,
    warps: BTreeSet<(SectorId, SectorId)>,
    discoveries: BTreeSet<(PlayerId, SectorId)>,
    ports: BTreeMap<SectorId, Port>,
    planets: BTreeMap<PlanetId, Planet>,
    corps: BTreeMap<CorpId, Corporation>,
    /// Join order is insertion order.
    members: Vec<CorpMember>,
    corp_messages: Vec<CorpMessage>,
    minefields: BTreeMap<u64, Minefield>,
    events: BTreeMap<u64, ActiveEvent>,
    intel: BTreeMap<(PlayerId, SectorId), PortIntel>,
    logs: Vec<(PlayerId, LogEntry)>,
    seasons: BTreeMap<u32, Season>,
    next_id: u64,
    /// Writes left before an injected `Unavailable` error.
    write_budget: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn write(&mut self) -> StoreResult<()> {
        match self.write_budget.as_mut() {
            Some(0) => Err(StoreError::Unavailable("injected write failure".into())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Make the write after `writes` successful ones fail with `Unavailable`.
    pub fn fail_after_writes(&mut self, writes: usize) {
        self.write_budget = Some(writes);
    }

    /// Run `f` as one transaction: on `Err` every change it made is discarded.
    pub fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
            self.write_budget = None;
        }
        result
    }

    /// Execute one command in its own transaction.
    pub fn execute(
        &mut self,
        player: PlayerId,
        request: &CommandRequest,
        config: &GameConfig,
        now: i64,
    ) -> Result<CommandResponse, EngineError> {
        self.transaction(|store| execute_command(store, player, request, config, now))
    }

    // ========================================================================
    // SEEDING
    // ========================================================================

    pub fn add_sector(&mut self, id: SectorId, name: &str) {
        self.sectors.insert(
            id,
            Sector {
                id,
                name: name.to_string(),
                is_protectorate: false,
                protectorate_fighters: 0,
            },
        );
    }

    pub fn set_protectorate(&mut self, id: SectorId, fighters: u32) {
        if let Some(sector) = self.sectors.get_mut(&id) {
            sector.is_protectorate = true;
            sector.protectorate_fighters = fighters;
        }
    }

    /// Two-way warp.
    pub fn link(&mut self, a: SectorId, b: SectorId) {
        self.warps.insert((a, b));
        self.warps.insert((b, a));
    }

    /// One-way warp.
    pub fn add_warp(&mut self, from: SectorId, to: SectorId) {
        self.warps.insert((from, to));
    }

    pub fn add_port(&mut self, port: Port) {
        self.ports.insert(port.sector_id, port);
    }

    pub fn add_planet(&mut self, mut planet: Planet) -> PlanetId {
        let id = self.next_id();
        planet.id = id;
        self.planets.insert(id, planet);
        id
    }

    pub fn add_event(&mut self, mut event: ActiveEvent) -> u64 {
        let id = self.next_id();
        event.id = id;
        self.events.insert(id, event);
        id
    }

    pub fn add_minefield(&mut self, mut field: Minefield) -> u64 {
        let id = self.next_id();
        field.id = id;
        self.minefields.insert(id, field);
        id
    }

    /// Load a validated universe document, replacing rows with the same ids.
    pub fn load_universe(&mut self, universe: &Universe) {
        for s in &universe.sectors {
            self.sectors.insert(s.id, s.clone());
        }
        self.warps.extend(universe.edges());
        for p in &universe.ports {
            self.ports.insert(p.sector_id, p.clone());
        }
    }

    pub fn add_season(&mut self, season: Season) {
        self.seasons.insert(season.id, season);
    }

    /// Store a player and reveal their current sector.
    pub fn add_player(&mut self, mut player: Player) {
        player.corp = None;
        self.discoveries.insert((player.id, player.sector_id));
        self.players.insert(player.id, player);
    }

    /// Register a player the way the server does on first join.
    pub fn join_player(
        &mut self,
        id: PlayerId,
        username: &str,
        config: &GameConfig,
        now: i64,
    ) -> StoreResult<Player> {
        let season = match self.seasons.values().next_back() {
            Some(s) => s.clone(),
            None => {
                let s = Season {
                    id: 1,
                    name: "Season 1".into(),
                    started_at: now,
                };
                self.add_season(s.clone());
                s
            }
        };
        let start = *self
            .sectors
            .keys()
            .next()
            .ok_or_else(|| StoreError::not_found("sector", "start"))?;
        let player = config.new_player(id, username, start, &season, now);
        self.add_player(player.clone());
        Ok(player)
    }

    // ========================================================================
    // INSPECTION
    // ========================================================================

    /// Stored player row, without the corp snapshot.
    pub fn player_row(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_row_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn port_row_mut(&mut self, sector: SectorId) -> Option<&mut Port> {
        self.ports.get_mut(&sector)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.values()
    }

    pub fn corps(&self) -> impl Iterator<Item = &Corporation> {
        self.corps.values()
    }

    pub fn corp_messages(&self) -> &[CorpMessage] {
        &self.corp_messages
    }

    pub fn minefields(&self) -> impl Iterator<Item = &Minefield> {
        self.minefields.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &ActiveEvent> {
        self.events.values()
    }

    pub fn is_discovered(&self, player: PlayerId, sector: SectorId) -> bool {
        self.discoveries.contains(&(player, sector))
    }

    /// Every log line for `player`, oldest first.
    pub fn logs_for(&self, player: PlayerId) -> Vec<&LogEntry> {
        self.logs
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, e)| e)
            .collect()
    }

    // ========================================================================
    // TICKERS
    // ========================================================================

    pub fn run_port_tick(&mut self) -> usize {
        self.ports
            .values_mut()
            .map(regen_port)
            .filter(|changed| *changed)
            .count()
    }

    pub fn run_planet_tick(&mut self) -> usize {
        self.planets
            .values_mut()
            .map(produce)
            .filter(|changed| *changed)
            .count()
    }

    pub fn run_protectorate_tick(&mut self, rng: &mut impl Rng) -> usize {
        let mut updated = 0;
        for sector in self.sectors.values_mut().filter(|s| s.is_protectorate) {
            sector.protectorate_fighters = roll_fighters(rng);
            updated += 1;
        }
        updated
    }

    pub fn run_event_tick(&mut self, rng: &mut impl Rng, now: i64) -> EventTick {
        let events: Vec<ActiveEvent> = self.events.values().cloned().collect();
        let sectors: Vec<SectorId> = self.sectors.keys().copied().collect();
        let port_sectors: Vec<SectorId> = self.ports.keys().copied().collect();
        let mut tick = plan_event_tick(rng, &events, &sectors, &port_sectors, now);
        for id in &tick.expired {
            self.events.remove(id);
        }
        if let Some(event) = tick.spawned.as_mut() {
            event.id = self.add_event(event.clone());
        }
        tick
    }
}

impl GameStore for MemoryStore {
    fn load_player_for_update(&mut self, id: PlayerId) -> StoreResult<Player> {
        let mut player = self
            .players
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("player", id))?;
        player.corp = self
            .members
            .iter()
            .find(|m| m.player_id == id)
            .and_then(|m| {
                self.corps.get(&m.corp_id).map(|c| CorpMembership {
                    corp_id: c.id,
                    name: c.name.clone(),
                    role: m.role,
                    bank: c.bank,
                })
            });
        Ok(player)
    }

    fn save_player(&mut self, player: &Player) -> StoreResult<()> {
        self.write()?;
        let row = self
            .players
            .get_mut(&player.id)
            .ok_or_else(|| StoreError::not_found("player", player.id))?;
        *row = Player {
            corp: None,
            ..player.clone()
        };
        Ok(())
    }

    fn username(&self, id: PlayerId) -> StoreResult<Option<String>> {
        Ok(self.players.get(&id).map(|p| p.username.clone()))
    }

    fn sector(&self, id: SectorId) -> StoreResult<Option<Sector>> {
        Ok(self.sectors.get(&id).cloned())
    }

    fn warps_from(&self, id: SectorId) -> StoreResult<Vec<SectorId>> {
        Ok(self
            .warps
            .range((id, SectorId::MIN)..=(id, SectorId::MAX))
            .map(|&(_, to)| to)
            .collect())
    }

    fn warps_among(&self, sectors: &[SectorId]) -> StoreResult<Vec<(SectorId, SectorId)>> {
        let set: BTreeSet<SectorId> = sectors.iter().copied().collect();
        Ok(self
            .warps
            .iter()
            .filter(|(a, b)| set.contains(a) && set.contains(b))
            .copied()
            .collect())
    }

    fn mark_discovered(&mut self, player: PlayerId, sector: SectorId) -> StoreResult<()> {
        self.write()?;
        self.discoveries.insert((player, sector));
        Ok(())
    }

    fn discovered_sectors(&self, player: PlayerId) -> StoreResult<Vec<SectorId>> {
        Ok(self
            .discoveries
            .range((player, SectorId::MIN)..=(player, SectorId::MAX))
            .map(|&(_, s)| s)
            .collect())
    }

    fn port(&self, sector: SectorId) -> StoreResult<Option<Port>> {
        Ok(self.ports.get(&sector).cloned())
    }

    fn save_port(&mut self, port: &Port) -> StoreResult<()> {
        self.write()?;
        let row = self
            .ports
            .get_mut(&port.sector_id)
            .ok_or_else(|| StoreError::not_found("port", port.sector_id))?;
        *row = port.clone();
        Ok(())
    }

    fn planet_in_sector(&self, sector: SectorId) -> StoreResult<Option<Planet>> {
        Ok(self
            .planets
            .values()
            .find(|p| p.sector_id == sector)
            .cloned())
    }

    fn insert_planet(&mut self, planet: Planet) -> StoreResult<PlanetId> {
        self.write()?;
        Ok(self.add_planet(planet))
    }

    fn save_planet(&mut self, planet: &Planet) -> StoreResult<()> {
        self.write()?;
        let row = self
            .planets
            .get_mut(&planet.id)
            .ok_or_else(|| StoreError::not_found("planet", planet.id))?;
        *row = planet.clone();
        Ok(())
    }

    fn count_corp_planets(&self, corp: CorpId) -> StoreResult<u32> {
        let n = self
            .planets
            .values()
            .filter(|p| p.owner.corp() == Some(corp))
            .count();
        Ok(u32::try_from(n).unwrap_or(u32::MAX))
    }

    fn corp(&self, id: CorpId) -> StoreResult<Option<Corporation>> {
        Ok(self.corps.get(&id).cloned())
    }

    fn find_corp_by_name(&self, name: &str) -> StoreResult<Option<Corporation>> {
        let wanted = name.to_lowercase();
        Ok(self
            .corps
            .values()
            .find(|c| c.name.to_lowercase() == wanted)
            .cloned())
    }

    fn insert_corp(&mut self, name: &str, _now: i64) -> StoreResult<CorpId> {
        self.write()?;
        let id = self.next_id();
        self.corps.insert(
            id,
            Corporation {
                id,
                name: name.to_string(),
                bank: 0,
            },
        );
        Ok(id)
    }

    fn save_corp(&mut self, corp: &Corporation) -> StoreResult<()> {
        self.write()?;
        let row = self
            .corps
            .get_mut(&corp.id)
            .ok_or_else(|| StoreError::not_found("corporation", corp.id))?;
        *row = corp.clone();
        Ok(())
    }

    fn delete_corp(&mut self, id: CorpId) -> StoreResult<()> {
        self.write()?;
        self.corps.remove(&id);
        self.members.retain(|m| m.corp_id != id);
        Ok(())
    }

    fn corp_members(&self, corp: CorpId) -> StoreResult<Vec<CorpMember>> {
        let mut members: Vec<CorpMember> = self
            .members
            .iter()
            .filter(|m| m.corp_id == corp)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    fn insert_corp_member(&mut self, member: CorpMember) -> StoreResult<()> {
        self.write()?;
        if self.members.iter().any(|m| m.player_id == member.player_id) {
            return Err(StoreError::Conflict(format!(
                "player {} already has a corporation",
                member.player_id
            )));
        }
        self.members.push(member);
        Ok(())
    }

    fn set_corp_role(&mut self, corp: CorpId, player: PlayerId, role: CorpRole) -> StoreResult<()> {
        self.write()?;
        let member = self
            .members
            .iter_mut()
            .find(|m| m.corp_id == corp && m.player_id == player)
            .ok_or_else(|| StoreError::not_found("corp member", player))?;
        member.role = role;
        Ok(())
    }

    fn delete_corp_member(&mut self, corp: CorpId, player: PlayerId) -> StoreResult<()> {
        self.write()?;
        self.members
            .retain(|m| !(m.corp_id == corp && m.player_id == player));
        Ok(())
    }

    fn insert_corp_message(
        &mut self,
        corp: CorpId,
        player: PlayerId,
        text: &str,
        now: i64,
    ) -> StoreResult<()> {
        self.write()?;
        self.corp_messages.push(CorpMessage {
            corp_id: corp,
            player_id: player,
            text: text.to_string(),
            at: now,
        });
        Ok(())
    }

    fn minefields_in_sector(&self, sector: SectorId) -> StoreResult<Vec<Minefield>> {
        Ok(self
            .minefields
            .values()
            .filter(|f| f.sector_id == sector)
            .cloned()
            .collect())
    }

    fn insert_minefield(&mut self, field: Minefield) -> StoreResult<u64> {
        self.write()?;
        Ok(self.add_minefield(field))
    }

    fn save_minefield(&mut self, field: &Minefield) -> StoreResult<()> {
        self.write()?;
        let row = self
            .minefields
            .get_mut(&field.id)
            .ok_or_else(|| StoreError::not_found("minefield", field.id))?;
        *row = field.clone();
        Ok(())
    }

    fn delete_minefield(&mut self, id: u64) -> StoreResult<()> {
        self.write()?;
        self.minefields.remove(&id);
        Ok(())
    }

    fn active_event(&self, sector: SectorId, now: i64) -> StoreResult<Option<ActiveEvent>> {
        Ok(self
            .events
            .values()
            .filter(|e| e.sector_id == sector && e.is_active(now))
            .min_by_key(|e| e.ends_at)
            .cloned())
    }

    fn active_events(&self, now: i64) -> StoreResult<Vec<ActiveEvent>> {
        let mut events: Vec<ActiveEvent> = self
            .events
            .values()
            .filter(|e| e.is_active(now))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.ends_at, e.id));
        Ok(events)
    }

    fn upsert_intel(&mut self, player: PlayerId, intel: &PortIntel) -> StoreResult<()> {
        self.write()?;
        self.intel.insert((player, intel.sector_id), intel.clone());
        Ok(())
    }

    fn delete_intel(&mut self, player: PlayerId, sector: SectorId) -> StoreResult<()> {
        self.write()?;
        self.intel.remove(&(player, sector));
        Ok(())
    }

    fn intel_for_player(&self, player: PlayerId) -> StoreResult<Vec<PortIntel>> {
        let mut list: Vec<PortIntel> = self
            .intel
            .range((player, SectorId::MIN)..=(player, SectorId::MAX))
            .map(|(_, i)| i.clone())
            .collect();
        sort_newest_first(&mut list);
        Ok(list)
    }

    fn insert_log(
        &mut self,
        player: PlayerId,
        kind: LogKind,
        message: &str,
        now: i64,
    ) -> StoreResult<()> {
        self.write()?;
        self.logs.push((
            player,
            LogEntry {
                at: now,
                kind,
                message: message.to_string(),
            },
        ));
        Ok(())
    }

    fn recent_logs(&self, player: PlayerId, limit: usize) -> StoreResult<Vec<LogEntry>> {
        Ok(self
            .logs
            .iter()
            .rev()
            .filter(|(p, _)| *p == player)
            .take(limit)
            .map(|(_, e)| e.clone())
            .collect())
    }

    fn prune_logs(&mut self, player: PlayerId, keep: usize) -> StoreResult<usize> {
        let total = self.logs.iter().filter(|(p, _)| *p == player).count();
        let excess = total.saturating_sub(keep);
        if excess == 0 {
            return Ok(0);
        }
        self.write()?;
        let mut skipped = 0;
        self.logs.retain(|(p, _)| {
            if *p != player || skipped >= excess {
                return true;
            }
            skipped += 1;
            false
        });
        Ok(excess)
    }

    fn season(&self, id: u32) -> StoreResult<Option<Season>> {
        Ok(self.seasons.get(&id).cloned())
    }

    fn rankings(&self, season: u32, limit: usize) -> StoreResult<Vec<RankingRow>> {
        let mut rows: Vec<RankingRow> = self
            .players
            .values()
            .filter(|p| p.season_id == season)
            .map(|p| RankingRow {
                username: p.username.clone(),
                credits: p.credits,
                corp_name: self
                    .members
                    .iter()
                    .find(|m| m.player_id == p.id)
                    .and_then(|m| self.corps.get(&m.corp_id))
                    .map(|c| c.name.clone()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commodity::{Commodity, Holds};
    use crate::model::Owner;
    use crate::testutil::{sample_player, sample_port};

    #[test]
    fn failed_transaction_restores_snapshot() {
        let mut store = MemoryStore::new();
        store.add_sector(1, "Sol");
        store.add_player(sample_player());
        let result: Result<(), StoreError> = store.transaction(|s| {
            s.insert_log(1, LogKind::System, "first", 0)?;
            s.mark_discovered(1, 9)?;
            Err(StoreError::Conflict("boom".into()))
        });
        assert!(result.is_err());
        assert!(store.logs_for(1).is_empty());
        assert!(!store.is_discovered(1, 9));
    }

    #[test]
    fn loaded_universe_is_navigable() {
        let universe = Universe::from_json(
            r#"{"sectors":[{"id":2,"name":"Vega","is_protectorate":false,"protectorate_fighters":0},
                           {"id":1,"name":"Sol","is_protectorate":true,"protectorate_fighters":60}],
                "warps":[{"from":1,"to":2}]}"#,
        )
        .unwrap();
        let mut store = MemoryStore::new();
        store.load_universe(&universe);
        assert_eq!(store.warps_from(1).unwrap(), vec![2]);
        assert_eq!(store.warps_from(2).unwrap(), vec![1]);
        let player = store
            .join_player(7, "nova", &GameConfig::default(), 100)
            .unwrap();
        assert_eq!(player.sector_id, 1);
        assert!(store.is_discovered(7, 1));
    }

    #[test]
    fn injected_failure_is_one_shot() {
        let mut store = MemoryStore::new();
        store.add_player(sample_player());
        store.fail_after_writes(1);
        let result = store.transaction(|s| {
            s.insert_log(1, LogKind::System, "ok", 0)?;
            s.insert_log(1, LogKind::System, "fails", 0)
        });
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(store.insert_log(1, LogKind::System, "later", 1).is_ok());
        assert_eq!(store.logs_for(1).len(), 1);
    }

    #[test]
    fn recent_logs_newest_first() {
        let mut store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert_log(1, LogKind::Action, &format!("m{i}"), i)
                .unwrap();
        }
        store.insert_log(2, LogKind::Action, "other", 9).unwrap();
        let logs = store.recent_logs(1, 3).unwrap();
        let msgs: Vec<&str> = logs.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(msgs, vec!["m4", "m3", "m2"]);
    }

    #[test]
    fn port_and_planet_ticks_count_changes() {
        let mut store = MemoryStore::new();
        store.add_port(sample_port(1));
        let mut full = sample_port(2);
        for c in Commodity::ALL {
            let stock = full.stock_mut(c);
            stock.qty = stock.base_qty;
        }
        store.add_port(full);
        assert_eq!(store.run_port_tick(), 1);
        assert_eq!(store.port(1).unwrap().unwrap().ore.qty, 820);

        let planet = store.add_planet(Planet {
            id: 0,
            sector_id: 1,
            name: "Terra".into(),
            owner: Owner::Player(1),
            production: Holds::new(10, 6, 3),
            storage: Holds::new(0, 0, 1_999),
            storage_max: 2_000,
            citadel_level: 0,
        });
        store.add_planet(Planet {
            id: 0,
            sector_id: 2,
            name: "Dust".into(),
            owner: Owner::Unowned,
            production: Holds::default(),
            storage: Holds::default(),
            storage_max: 2_000,
            citadel_level: 0,
        });
        assert_eq!(store.run_planet_tick(), 1);
        let stored = store.planets().find(|p| p.id == planet).unwrap();
        assert_eq!(stored.storage, Holds::new(10, 6, 2_000));
    }

    #[test]
    fn pruning_keeps_newest_logs_per_player() {
        let mut store = MemoryStore::new();
        for i in 0..6 {
            store
                .insert_log(1, LogKind::Action, &format!("m{i}"), i)
                .unwrap();
        }
        store.insert_log(2, LogKind::Action, "other", 9).unwrap();
        assert_eq!(store.prune_logs(1, 4).unwrap(), 2);
        assert_eq!(store.prune_logs(1, 4).unwrap(), 0);
        let msgs: Vec<&str> = store
            .logs_for(1)
            .iter()
            .map(|l| l.message.as_str())
            .collect();
        assert_eq!(msgs, vec!["m2", "m3", "m4", "m5"]);
        assert_eq!(store.logs_for(2).len(), 1);
    }

    #[test]
    fn corp_lookup_ignores_case() {
        let mut store = MemoryStore::new();
        let id = store.insert_corp("Iron Hand", 0).unwrap();
        assert_eq!(store.find_corp_by_name("iron hand").unwrap().map(|c| c.id), Some(id));
        assert!(store.find_corp_by_name("iron").unwrap().is_none());
    }

    #[test]
    fn member_order_is_join_time_then_insertion() {
        let mut store = MemoryStore::new();
        for (player, at) in [(1, 10), (2, 5), (3, 10)] {
            store
                .insert_corp_member(CorpMember {
                    corp_id: 7,
                    player_id: player,
                    role: CorpRole::Member,
                    joined_at: at,
                })
                .unwrap();
        }
        let order: Vec<PlayerId> = store
            .corp_members(7)
            .unwrap()
            .iter()
            .map(|m| m.player_id)
            .collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn rankings_sort_and_label() {
        let mut store = MemoryStore::new();
        let mut a = sample_player();
        a.id = 1;
        a.username = "zed".into();
        a.credits = 500;
        let mut b = sample_player();
        b.id = 2;
        b.username = "amy".into();
        b.credits = 500;
        let mut c = sample_player();
        c.id = 3;
        c.username = "max".into();
        c.credits = 900;
        c.season_id = 99;
        for p in [a, b, c] {
            store.add_player(p);
        }
        let corp = store.insert_corp("Nova", 0).unwrap();
        store
            .insert_corp_member(CorpMember {
                corp_id: corp,
                player_id: 1,
                role: CorpRole::Leader,
                joined_at: 0,
            })
            .unwrap();
        let rows = store.rankings(1, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].username, "amy");
        assert_eq!(rows[1].corp_name.as_deref(), Some("Nova"));
    }
}
