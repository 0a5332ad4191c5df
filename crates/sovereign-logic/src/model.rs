//! Domain records shared by the engine, the stores and the tickers.
//!
//! Timestamps are Unix seconds (`i64`). Identifiers are plain integers so the
//! same records map directly onto SpacetimeDB rows and the in-memory store.

use serde::{Deserialize, Serialize};

use crate::commodity::{Commodity, Holds};
use crate::ships::ShipClass;

pub type PlayerId = u64;
pub type SectorId = u32;
pub type CorpId = u64;
pub type PlanetId = u64;

// ============================================================================
// OWNERSHIP
// ============================================================================

/// Who controls a planet or a minefield.
///
/// A corp-held asset remembers the player who claimed it so the founder keeps
/// access after leaving the corporation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Unowned,
    Player(PlayerId),
    Corp { corp: CorpId, founder: PlayerId },
}

impl Owner {
    /// Ownership for something claimed by `player`, attributed to their corp if any.
    pub fn claimed_by(player: PlayerId, corp: Option<CorpId>) -> Self {
        match corp {
            Some(corp) => Owner::Corp {
                corp,
                founder: player,
            },
            None => Owner::Player(player),
        }
    }

    pub fn is_owned(&self) -> bool {
        !matches!(self, Owner::Unowned)
    }

    /// The player who claimed the asset, if any.
    pub fn player(&self) -> Option<PlayerId> {
        match *self {
            Owner::Unowned => None,
            Owner::Player(id) => Some(id),
            Owner::Corp { founder, .. } => Some(founder),
        }
    }

    pub fn corp(&self) -> Option<CorpId> {
        match *self {
            Owner::Corp { corp, .. } => Some(corp),
            Owner::Unowned | Owner::Player(_) => None,
        }
    }

    /// True when `player` (optionally a member of `corp`) counts as an owner.
    pub fn grants_access(&self, player: PlayerId, corp: Option<CorpId>) -> bool {
        match *self {
            Owner::Unowned => false,
            Owner::Player(id) => id == player,
            Owner::Corp { corp: owner_corp, founder } => {
                founder == player || corp == Some(owner_corp)
            }
        }
    }
}

// ============================================================================
// PLAYER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CorpRole {
    Leader,
    Officer,
    Member,
}

impl CorpRole {
    pub fn as_str(self) -> &'static str {
        match self {
            CorpRole::Leader => "LEADER",
            CorpRole::Officer => "OFFICER",
            CorpRole::Member => "MEMBER",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "LEADER" => Some(CorpRole::Leader),
            "OFFICER" => Some(CorpRole::Officer),
            "MEMBER" => Some(CorpRole::Member),
            _ => None,
        }
    }

    pub fn can_withdraw(self) -> bool {
        matches!(self, CorpRole::Leader | CorpRole::Officer)
    }
}

/// Snapshot of the player's corporation taken when the player row is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpMembership {
    pub corp_id: CorpId,
    pub name: String,
    pub role: CorpRole,
    pub bank: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub is_admin: bool,
    pub must_change_password: bool,
    pub credits: i64,
    pub xp: i64,
    pub level: u32,
    pub ship: ShipClass,
    pub cargo_upgrades: u32,
    pub turn_upgrades: u32,
    pub turns: u32,
    pub turns_max: u32,
    pub sector_id: SectorId,
    pub cargo_max: u32,
    pub cargo: Holds,
    /// Unset until the first regen pass stamps it.
    pub last_turn_regen: Option<i64>,
    pub season_id: u32,
    pub season_name: String,
    pub corp: Option<CorpMembership>,
}

impl Player {
    pub fn corp_id(&self) -> Option<CorpId> {
        self.corp.as_ref().map(|c| c.corp_id)
    }

    pub fn free_cargo(&self) -> u32 {
        self.cargo_max.saturating_sub(self.cargo.total())
    }
}

// ============================================================================
// WORLD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub name: String,
    pub is_protectorate: bool,
    pub protectorate_fighters: u32,
}

/// Which side of the market a port takes for one commodity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeMode {
    /// The port buys from players.
    Buy,
    /// The port sells to players.
    Sell,
}

impl TradeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeMode::Buy => "BUY",
            TradeMode::Sell => "SELL",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "BUY" => Some(TradeMode::Buy),
            "SELL" => Some(TradeMode::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStock {
    pub mode: TradeMode,
    pub qty: u32,
    pub base_qty: u32,
    pub base_price: u32,
    pub regen: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub sector_id: SectorId,
    pub ore: PortStock,
    pub organics: PortStock,
    pub equipment: PortStock,
}

impl Port {
    pub fn stock(&self, commodity: Commodity) -> &PortStock {
        match commodity {
            Commodity::Ore => &self.ore,
            Commodity::Organics => &self.organics,
            Commodity::Equipment => &self.equipment,
        }
    }

    pub fn stock_mut(&mut self, commodity: Commodity) -> &mut PortStock {
        match commodity {
            Commodity::Ore => &mut self.ore,
            Commodity::Organics => &mut self.organics,
            Commodity::Equipment => &mut self.equipment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planet {
    pub id: PlanetId,
    pub sector_id: SectorId,
    pub name: String,
    pub owner: Owner,
    pub production: Holds,
    /// Each commodity is capped at `storage_max` independently.
    pub storage: Holds,
    pub storage_max: u32,
    pub citadel_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corporation {
    pub id: CorpId,
    pub name: String,
    pub bank: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpMember {
    pub corp_id: CorpId,
    pub player_id: PlayerId,
    pub role: CorpRole,
    pub joined_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpMessage {
    pub corp_id: CorpId,
    pub player_id: PlayerId,
    pub text: String,
    pub at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minefield {
    pub id: u64,
    pub sector_id: SectorId,
    pub owner: Owner,
    pub qty: u32,
    pub created_at: i64,
}

impl Minefield {
    /// Hostile to `player` unless the player laid it or shares its corp.
    pub fn is_hostile_to(&self, player: PlayerId, corp: Option<CorpId>) -> bool {
        if self.owner.player() == Some(player) {
            return false;
        }
        match (self.owner.corp(), corp) {
            (Some(owner_corp), Some(player_corp)) => owner_corp != player_corp,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub id: u32,
    pub name: String,
    pub started_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    pub username: String,
    pub credits: i64,
    pub corp_name: Option<String>,
}

// ============================================================================
// LOGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogKind {
    System,
    Action,
    Combat,
    Corp,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::System => "SYSTEM",
            LogKind::Action => "ACTION",
            LogKind::Combat => "COMBAT",
            LogKind::Corp => "CORP",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "SYSTEM" => Some(LogKind::System),
            "ACTION" => Some(LogKind::Action),
            "COMBAT" => Some(LogKind::Combat),
            "CORP" => Some(LogKind::Corp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: i64,
    pub kind: LogKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(owner: Owner) -> Minefield {
        Minefield {
            id: 1,
            sector_id: 4,
            owner,
            qty: 10,
            created_at: 0,
        }
    }

    #[test]
    fn corp_planet_grants_founder_and_members() {
        let owner = Owner::Corp {
            corp: 7,
            founder: 1,
        };
        assert!(owner.grants_access(1, None));
        assert!(owner.grants_access(2, Some(7)));
        assert!(!owner.grants_access(3, Some(8)));
        assert!(!Owner::Unowned.grants_access(1, Some(7)));
    }

    #[test]
    fn minefield_hostility() {
        let solo = field(Owner::Player(1));
        assert!(!solo.is_hostile_to(1, None));
        assert!(solo.is_hostile_to(2, None));
        assert!(solo.is_hostile_to(2, Some(9)));

        let corp = field(Owner::Corp {
            corp: 9,
            founder: 1,
        });
        assert!(!corp.is_hostile_to(2, Some(9)));
        assert!(corp.is_hostile_to(2, Some(10)));
        assert!(corp.is_hostile_to(2, None));
    }

    #[test]
    fn claimed_by_prefers_corp() {
        assert_eq!(Owner::claimed_by(3, None), Owner::Player(3));
        assert_eq!(
            Owner::claimed_by(3, Some(4)),
            Owner::Corp {
                corp: 4,
                founder: 3
            }
        );
    }
}
