//! Game configuration: regen and ticker intervals, log window, starting values.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a valid
//! configuration. Call [`GameConfig::normalized`] before use to apply floors
//! and clamps.

use serde::{Deserialize, Serialize};

use crate::commodity::Holds;
use crate::model::{Player, PlayerId, SectorId, Season};
use crate::progression::level_for_xp;
use crate::regen::MIN_REGEN_SECONDS;
use crate::ships::ShipClass;

pub const MIN_ECONOMY_TICK_SECONDS: u32 = 5;
pub const MIN_WORLD_TICK_SECONDS: u32 = 10;
pub const MAX_RECENT_LOGS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub turn_regen_seconds: u32,
    pub port_tick_seconds: u32,
    pub planet_tick_seconds: u32,
    /// 0 disables the event ticker.
    pub event_tick_seconds: u32,
    /// 0 disables the protectorate fighter ticker.
    pub protectorate_tick_seconds: u32,
    pub recent_log_limit: usize,
    pub start_credits: i64,
    pub start_turns: u32,
    pub start_turns_max: u32,
    pub start_cargo_max: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_regen_seconds: 120,
            port_tick_seconds: 60,
            planet_tick_seconds: 60,
            event_tick_seconds: 60,
            protectorate_tick_seconds: 60,
            recent_log_limit: 20,
            start_credits: 1_000,
            start_turns: 100,
            start_turns_max: 100,
            start_cargo_max: 30,
        }
    }
}

fn floor_or_disabled(value: u32, floor: u32) -> u32 {
    if value == 0 {
        0
    } else {
        value.max(floor)
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON document and normalize it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn normalized(&self) -> Self {
        let start_turns_max = self.start_turns_max.max(1);
        Self {
            turn_regen_seconds: self
                .turn_regen_seconds
                .max(MIN_REGEN_SECONDS as u32),
            port_tick_seconds: self.port_tick_seconds.max(MIN_ECONOMY_TICK_SECONDS),
            planet_tick_seconds: self.planet_tick_seconds.max(MIN_ECONOMY_TICK_SECONDS),
            event_tick_seconds: floor_or_disabled(self.event_tick_seconds, MIN_WORLD_TICK_SECONDS),
            protectorate_tick_seconds: floor_or_disabled(
                self.protectorate_tick_seconds,
                MIN_WORLD_TICK_SECONDS,
            ),
            recent_log_limit: self.recent_log_limit.clamp(1, MAX_RECENT_LOGS),
            start_credits: self.start_credits.max(0),
            start_turns: self.start_turns.min(start_turns_max),
            start_turns_max,
            start_cargo_max: self.start_cargo_max.max(1),
        }
    }

    pub fn regen_seconds(&self) -> i64 {
        i64::from(self.turn_regen_seconds)
    }

    /// A freshly registered player in `sector` for `season`.
    pub fn new_player(
        &self,
        id: PlayerId,
        username: &str,
        sector: SectorId,
        season: &Season,
        now: i64,
    ) -> Player {
        Player {
            id,
            username: username.to_string(),
            is_admin: false,
            must_change_password: false,
            credits: self.start_credits,
            xp: 0,
            level: level_for_xp(0),
            ship: ShipClass::Scout,
            cargo_upgrades: 0,
            turn_upgrades: 0,
            turns: self.start_turns,
            turns_max: self.start_turns_max,
            sector_id: sector,
            cargo_max: self.start_cargo_max,
            cargo: Holds::default(),
            last_turn_regen: Some(now),
            season_id: season.id,
            season_name: season.name.clone(),
            corp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_empty_document() {
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = GameConfig::from_json(r#"{"turn_regen_seconds": 30}"#).unwrap();
        assert_eq!(config.turn_regen_seconds, 30);
        assert_eq!(config.port_tick_seconds, 60);
        assert_eq!(config.recent_log_limit, 20);
    }

    #[test]
    fn floors_and_clamps() {
        let raw = GameConfig {
            turn_regen_seconds: 1,
            port_tick_seconds: 1,
            planet_tick_seconds: 0,
            event_tick_seconds: 3,
            protectorate_tick_seconds: 0,
            recent_log_limit: 500,
            ..GameConfig::default()
        };
        let config = raw.normalized();
        assert_eq!(config.turn_regen_seconds, 10);
        assert_eq!(config.port_tick_seconds, 5);
        assert_eq!(config.planet_tick_seconds, 5);
        assert_eq!(config.event_tick_seconds, 10);
        assert_eq!(config.protectorate_tick_seconds, 0);
        assert_eq!(config.recent_log_limit, 50);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(GameConfig::from_json("{not json").is_err());
        assert!(GameConfig::from_json(r#"{"start_credits": "lots"}"#).is_err());
    }

    #[test]
    fn new_player_starting_values() {
        let season = Season {
            id: 3,
            name: "Season 3".into(),
            started_at: 0,
        };
        let p = GameConfig::default().new_player(9, "nova", 1, &season, 500);
        assert_eq!(p.credits, 1_000);
        assert_eq!((p.turns, p.turns_max, p.cargo_max), (100, 100, 30));
        assert_eq!(p.ship, ShipClass::Scout);
        assert_eq!(p.level, 1);
        assert_eq!(p.season_name, "Season 3");
        assert_eq!(p.last_turn_regen, Some(500));
    }
}
