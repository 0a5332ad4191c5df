//! Storage contract consumed by the command engine.
//!
//! A `GameStore` is always used inside one transaction per command: the
//! caller opens it, runs the engine, and commits on `Ok` or rolls back on
//! `Err`. Reads observe the transaction's own writes.
//!
//! Two implementations exist: [`crate::memory::MemoryStore`] for tests and
//! the harness, and the SpacetimeDB reducer-context store in the server crate.

use thiserror::Error;

use crate::events::ActiveEvent;
use crate::intel::PortIntel;
use crate::model::{
    CorpId, CorpMember, CorpRole, Corporation, LogEntry, LogKind, Minefield, Planet, PlanetId,
    Player, PlayerId, Port, RankingRow, Season, Sector, SectorId,
};

/// Infrastructure failure. Any of these aborts the whole transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("transaction conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ids past the newest `keep`, given one player's log ids in any order.
pub fn log_ids_to_prune(mut ids: Vec<u64>, keep: usize) -> Vec<u64> {
    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids.split_off(keep.min(ids.len()))
}

pub trait GameStore {
    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Load the acting player, with their corp membership snapshot, and hold
    /// it for the rest of the transaction.
    fn load_player_for_update(&mut self, id: PlayerId) -> StoreResult<Player>;

    /// Overwrite the player's mutable fields. `corp` is ignored.
    fn save_player(&mut self, player: &Player) -> StoreResult<()>;

    fn username(&self, id: PlayerId) -> StoreResult<Option<String>>;

    // ------------------------------------------------------------------
    // Sectors and discovery
    // ------------------------------------------------------------------

    fn sector(&self, id: SectorId) -> StoreResult<Option<Sector>>;

    /// Outgoing warps, ascending.
    fn warps_from(&self, id: SectorId) -> StoreResult<Vec<SectorId>>;

    /// Every warp whose endpoints are both in `sectors`.
    fn warps_among(&self, sectors: &[SectorId]) -> StoreResult<Vec<(SectorId, SectorId)>>;

    fn has_warp(&self, from: SectorId, to: SectorId) -> StoreResult<bool> {
        Ok(self.warps_from(from)?.contains(&to))
    }

    /// Insert-if-absent.
    fn mark_discovered(&mut self, player: PlayerId, sector: SectorId) -> StoreResult<()>;

    fn discovered_sectors(&self, player: PlayerId) -> StoreResult<Vec<SectorId>>;

    // ------------------------------------------------------------------
    // Ports
    // ------------------------------------------------------------------

    fn port(&self, sector: SectorId) -> StoreResult<Option<Port>>;

    /// Load a port that is about to be traded against.
    fn load_port_for_update(&mut self, sector: SectorId) -> StoreResult<Option<Port>> {
        self.port(sector)
    }

    fn save_port(&mut self, port: &Port) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Planets
    // ------------------------------------------------------------------

    fn planet_in_sector(&self, sector: SectorId) -> StoreResult<Option<Planet>>;

    fn load_planet_for_update(&mut self, sector: SectorId) -> StoreResult<Option<Planet>> {
        self.planet_in_sector(sector)
    }

    /// Insert a planet; the `id` field is ignored and the new id returned.
    fn insert_planet(&mut self, planet: Planet) -> StoreResult<PlanetId>;

    fn save_planet(&mut self, planet: &Planet) -> StoreResult<()>;

    fn count_corp_planets(&self, corp: CorpId) -> StoreResult<u32>;

    // ------------------------------------------------------------------
    // Corporations
    // ------------------------------------------------------------------

    fn corp(&self, id: CorpId) -> StoreResult<Option<Corporation>>;

    /// Case-insensitive lookup.
    fn find_corp_by_name(&self, name: &str) -> StoreResult<Option<Corporation>>;

    fn load_corp_for_update(&mut self, id: CorpId) -> StoreResult<Option<Corporation>> {
        self.corp(id)
    }

    fn insert_corp(&mut self, name: &str, now: i64) -> StoreResult<CorpId>;

    fn save_corp(&mut self, corp: &Corporation) -> StoreResult<()>;

    fn delete_corp(&mut self, id: CorpId) -> StoreResult<()>;

    /// Members ordered by `joined_at`, then by join order.
    fn corp_members(&self, corp: CorpId) -> StoreResult<Vec<CorpMember>>;

    fn insert_corp_member(&mut self, member: CorpMember) -> StoreResult<()>;

    fn set_corp_role(&mut self, corp: CorpId, player: PlayerId, role: CorpRole) -> StoreResult<()>;

    fn delete_corp_member(&mut self, corp: CorpId, player: PlayerId) -> StoreResult<()>;

    fn insert_corp_message(
        &mut self,
        corp: CorpId,
        player: PlayerId,
        text: &str,
        now: i64,
    ) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Mines
    // ------------------------------------------------------------------

    fn minefields_in_sector(&self, sector: SectorId) -> StoreResult<Vec<Minefield>>;

    /// Insert a minefield; the `id` field is ignored and the new id returned.
    fn insert_minefield(&mut self, field: Minefield) -> StoreResult<u64>;

    fn save_minefield(&mut self, field: &Minefield) -> StoreResult<()>;

    fn delete_minefield(&mut self, id: u64) -> StoreResult<()>;

    fn mine_total(&self, sector: SectorId) -> StoreResult<u32> {
        Ok(self
            .minefields_in_sector(sector)?
            .iter()
            .fold(0u32, |acc, f| acc.saturating_add(f.qty)))
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    fn active_event(&self, sector: SectorId, now: i64) -> StoreResult<Option<ActiveEvent>>;

    /// Active events, soonest-ending first.
    fn active_events(&self, now: i64) -> StoreResult<Vec<ActiveEvent>>;

    // ------------------------------------------------------------------
    // Intel
    // ------------------------------------------------------------------

    fn upsert_intel(&mut self, player: PlayerId, intel: &PortIntel) -> StoreResult<()>;

    fn delete_intel(&mut self, player: PlayerId, sector: SectorId) -> StoreResult<()>;

    /// The player's intel, newest scan first.
    fn intel_for_player(&self, player: PlayerId) -> StoreResult<Vec<PortIntel>>;

    // ------------------------------------------------------------------
    // Logs
    // ------------------------------------------------------------------

    fn insert_log(
        &mut self,
        player: PlayerId,
        kind: LogKind,
        message: &str,
        now: i64,
    ) -> StoreResult<()>;

    /// Newest first, at most `limit` entries.
    fn recent_logs(&self, player: PlayerId, limit: usize) -> StoreResult<Vec<LogEntry>>;

    /// Drop all but the newest `keep` entries for `player`. Returns how many went.
    fn prune_logs(&mut self, player: PlayerId, keep: usize) -> StoreResult<usize>;

    // ------------------------------------------------------------------
    // Seasons
    // ------------------------------------------------------------------

    fn season(&self, id: u32) -> StoreResult<Option<Season>>;

    /// Richest players of a season: credits descending, then username.
    fn rankings(&self, season: u32, limit: usize) -> StoreResult<Vec<RankingRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_selects_oldest_ids() {
        assert_eq!(log_ids_to_prune(vec![3, 9, 1, 7], 2), vec![3, 1]);
        assert!(log_ids_to_prune(vec![4, 2], 5).is_empty());
        assert_eq!(log_ids_to_prune(vec![4, 2], 0), vec![4, 2]);
    }
}
