//! SpacetimeDB table definitions for the game universe.
//!
//! Enums from the logic crate are stored as their upper-case codes
//! (`"SELL"`, `"LEADER"`, `"INVASION"`); `store.rs` converts rows to and from
//! the logic model.

use spacetimedb::{client_visibility_filter, table, Filter, Identity, ScheduleAt, Timestamp};

use crate::simulation::{event_tick, planet_tick, port_tick, protectorate_tick};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Game settings singleton (id always 0).
#[table(name = game_config)]
#[derive(Clone)]
pub struct GameConfigRow {
    #[primary_key]
    pub id: u32,
    /// Identity that published the module; may always administer it.
    pub owner: Identity,
    /// `GameConfig` as JSON.
    pub settings: String,
}

#[table(name = season, public)]
#[derive(Clone)]
pub struct Season {
    #[primary_key]
    #[auto_inc]
    pub id: u32,
    pub name: String,
    pub started_at: i64,
}

// ============================================================================
// PLAYERS
// ============================================================================

#[table(name = player, public)]
#[derive(Clone)]
pub struct Player {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[unique]
    pub identity: Identity,
    pub username: String,
    pub is_admin: bool,
    pub must_change_password: bool,
    pub credits: i64,
    pub xp: i64,
    pub level: u32,
    pub ship_type: String,
    pub cargo_upgrades: u32,
    pub turn_upgrades: u32,
    pub turns: u32,
    pub turns_max: u32,
    pub sector_id: u32,
    pub cargo_max: u32,
    pub cargo_ore: u32,
    pub cargo_organics: u32,
    pub cargo_equipment: u32,
    /// Unix seconds; unset until the first regen pass.
    pub last_turn_regen: Option<i64>,
    pub season_id: u32,
    pub created_at: Timestamp,
}

/// Connected client session
#[table(name = online_player, public)]
pub struct OnlinePlayer {
    #[primary_key]
    pub identity: Identity,
    pub player_id: Option<u64>,
    pub connected_at: Timestamp,
}

/// Latest command response per player, as JSON. Each client only sees its own row.
#[table(name = command_result, public)]
pub struct CommandResult {
    #[primary_key]
    pub player_id: u64,
    pub identity: Identity,
    pub payload: String,
    pub at: Timestamp,
}

#[client_visibility_filter]
const COMMAND_RESULT_OWNER: Filter =
    Filter::Sql("SELECT * FROM command_result WHERE identity = :sender");

#[table(name = game_log)]
pub struct GameLog {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub player_id: u64,
    pub kind: String,
    pub message: String,
    pub at: i64,
}

#[table(name = discovery)]
pub struct Discovery {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub player_id: u64,
    pub sector_id: u32,
}

/// Port snapshot taken by SCAN, as JSON.
#[table(name = port_intel)]
pub struct PortIntel {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub player_id: u64,
    pub sector_id: u32,
    pub scanned_at: i64,
    pub payload: String,
}

// ============================================================================
// UNIVERSE
// ============================================================================

#[table(name = sector, public)]
#[derive(Clone)]
pub struct Sector {
    #[primary_key]
    pub id: u32,
    pub name: String,
    pub is_protectorate: bool,
    pub protectorate_fighters: u32,
}

/// One-way warp; two-way links are two rows.
#[table(name = warp, public)]
pub struct Warp {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub from_sector: u32,
    pub to_sector: u32,
}

#[table(name = port, public)]
#[derive(Clone)]
pub struct Port {
    #[primary_key]
    pub sector_id: u32,
    pub ore_mode: String,
    pub ore_qty: u32,
    pub ore_base_qty: u32,
    pub ore_base_price: u32,
    pub ore_regen: u32,
    pub organics_mode: String,
    pub organics_qty: u32,
    pub organics_base_qty: u32,
    pub organics_base_price: u32,
    pub organics_regen: u32,
    pub equipment_mode: String,
    pub equipment_qty: u32,
    pub equipment_base_qty: u32,
    pub equipment_base_price: u32,
    pub equipment_regen: u32,
}

#[table(name = planet, public)]
#[derive(Clone)]
pub struct Planet {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[unique]
    pub sector_id: u32,
    pub name: String,
    pub owner_player_id: Option<u64>,
    pub owner_corp_id: Option<u64>,
    pub prod_ore: u32,
    pub prod_organics: u32,
    pub prod_equipment: u32,
    pub ore: u32,
    pub organics: u32,
    pub equipment: u32,
    pub storage_max: u32,
    pub citadel_level: u32,
}

#[table(name = minefield, public)]
#[derive(Clone)]
pub struct Minefield {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub sector_id: u32,
    pub owner_player_id: Option<u64>,
    pub owner_corp_id: Option<u64>,
    pub qty: u32,
    pub created_at: i64,
}

#[table(name = sector_event, public)]
#[derive(Clone)]
pub struct SectorEvent {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub kind: String,
    pub sector_id: u32,
    /// Empty for events that cover every commodity.
    pub commodity: String,
    pub price_percent: i32,
    pub severity: u32,
    pub title: String,
    pub description: String,
    pub started_at: i64,
    pub ends_at: i64,
}

// ============================================================================
// CORPORATIONS
// ============================================================================

#[table(name = corporation, public)]
#[derive(Clone)]
pub struct Corporation {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[unique]
    pub name: String,
    pub bank: i64,
    pub created_at: i64,
}

/// A player belongs to at most one corporation; `id` orders same-second joins.
#[table(name = corp_member, public)]
#[derive(Clone)]
pub struct CorpMember {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[unique]
    pub player_id: u64,
    pub corp_id: u64,
    pub role: String,
    pub joined_at: i64,
}

#[table(name = corp_message)]
pub struct CorpMessage {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub corp_id: u64,
    pub player_id: u64,
    pub text: String,
    pub at: i64,
}

// ============================================================================
// SCHEDULES
// ============================================================================

#[table(name = port_tick_timer, scheduled(port_tick))]
pub struct PortTickTimer {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,
    pub scheduled_at: ScheduleAt,
}

#[table(name = planet_tick_timer, scheduled(planet_tick))]
pub struct PlanetTickTimer {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,
    pub scheduled_at: ScheduleAt,
}

#[table(name = event_tick_timer, scheduled(event_tick))]
pub struct EventTickTimer {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,
    pub scheduled_at: ScheduleAt,
}

#[table(name = protectorate_tick_timer, scheduled(protectorate_tick))]
pub struct ProtectorateTickTimer {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,
    pub scheduled_at: ScheduleAt,
}
