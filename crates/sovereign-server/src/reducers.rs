//! Client-facing reducers: session lifecycle, joining, commands and admin.

use std::collections::HashSet;
use std::time::Duration;

use spacetimedb::{reducer, ReducerContext, ScheduleAt, Table};

use sovereign_logic::command::CommandRequest;
use sovereign_logic::config::GameConfig;
use sovereign_logic::engine::execute_command;
use sovereign_logic::model as m;
use sovereign_logic::rules::sanitize_single_line;
use sovereign_logic::store::GameStore;
use sovereign_logic::universe::Universe;

use crate::store::{port_row, DbStore};
use crate::tables::*;

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 24;

/// Current time in Unix seconds.
pub(crate) fn now_secs(ctx: &ReducerContext) -> i64 {
    ctx.timestamp.to_micros_since_unix_epoch() / 1_000_000
}

/// Stored settings, or defaults when the row is missing or unreadable.
pub(crate) fn load_config(ctx: &ReducerContext) -> GameConfig {
    let Some(row) = ctx.db.game_config().id().find(0) else {
        return GameConfig::default();
    };
    GameConfig::from_json(&row.settings).unwrap_or_else(|e| {
        log::warn!("stored game config is invalid ({e}); using defaults");
        GameConfig::default()
    })
}

fn require_admin(ctx: &ReducerContext) -> Result<(), String> {
    let is_owner = ctx
        .db
        .game_config()
        .id()
        .find(0)
        .is_some_and(|c| c.owner == ctx.sender);
    let is_admin_player = ctx
        .db
        .player()
        .identity()
        .find(ctx.sender)
        .is_some_and(|p| p.is_admin);
    if is_owner || is_admin_player {
        Ok(())
    } else {
        Err("Admin only".to_string())
    }
}

fn interval(seconds: u32) -> ScheduleAt {
    ScheduleAt::Interval(Duration::from_secs(u64::from(seconds)).into())
}

/// Replace every ticker schedule with one matching `config`.
/// A zero interval leaves that ticker unscheduled.
fn schedule_tickers(ctx: &ReducerContext, config: &GameConfig) -> Result<(), String> {
    for t in ctx.db.port_tick_timer().iter() {
        ctx.db.port_tick_timer().scheduled_id().delete(t.scheduled_id);
    }
    for t in ctx.db.planet_tick_timer().iter() {
        ctx.db.planet_tick_timer().scheduled_id().delete(t.scheduled_id);
    }
    for t in ctx.db.event_tick_timer().iter() {
        ctx.db.event_tick_timer().scheduled_id().delete(t.scheduled_id);
    }
    for t in ctx.db.protectorate_tick_timer().iter() {
        ctx.db
            .protectorate_tick_timer()
            .scheduled_id()
            .delete(t.scheduled_id);
    }

    ctx.db
        .port_tick_timer()
        .try_insert(PortTickTimer {
            scheduled_id: 0,
            scheduled_at: interval(config.port_tick_seconds),
        })
        .map_err(|e| format!("Failed to schedule port tick: {e}"))?;
    ctx.db
        .planet_tick_timer()
        .try_insert(PlanetTickTimer {
            scheduled_id: 0,
            scheduled_at: interval(config.planet_tick_seconds),
        })
        .map_err(|e| format!("Failed to schedule planet tick: {e}"))?;
    if config.event_tick_seconds > 0 {
        ctx.db
            .event_tick_timer()
            .try_insert(EventTickTimer {
                scheduled_id: 0,
                scheduled_at: interval(config.event_tick_seconds),
            })
            .map_err(|e| format!("Failed to schedule event tick: {e}"))?;
    }
    if config.protectorate_tick_seconds > 0 {
        ctx.db
            .protectorate_tick_timer()
            .try_insert(ProtectorateTickTimer {
                scheduled_id: 0,
                scheduled_at: interval(config.protectorate_tick_seconds),
            })
            .map_err(|e| format!("Failed to schedule protectorate tick: {e}"))?;
    }
    log::info!(
        "tickers scheduled: port {}s, planet {}s, event {}s, protectorate {}s",
        config.port_tick_seconds,
        config.planet_tick_seconds,
        config.event_tick_seconds,
        config.protectorate_tick_seconds
    );
    Ok(())
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[reducer(init)]
pub fn init(ctx: &ReducerContext) -> Result<(), String> {
    log::info!("Initializing Sovereign Conquest module");
    let config = GameConfig::default();
    if ctx.db.game_config().id().find(0).is_none() {
        let settings = config.to_json().map_err(|e| e.to_string())?;
        ctx.db.game_config().insert(GameConfigRow {
            id: 0,
            owner: ctx.sender,
            settings,
        });
    }
    if ctx.db.season().iter().next().is_none() {
        ctx.db.season().insert(Season {
            id: 0,
            name: "Season 1".to_string(),
            started_at: now_secs(ctx),
        });
    }
    schedule_tickers(ctx, &load_config(ctx))
}

/// Called when a client connects
#[reducer(client_connected)]
pub fn client_connected(ctx: &ReducerContext) {
    log::info!("Client connected: {:?}", ctx.sender);
    let player_id = ctx.db.player().identity().find(ctx.sender).map(|p| p.id);
    if ctx.db.online_player().identity().find(ctx.sender).is_some() {
        ctx.db.online_player().identity().delete(ctx.sender);
    }
    ctx.db.online_player().insert(OnlinePlayer {
        identity: ctx.sender,
        player_id,
        connected_at: ctx.timestamp,
    });
}

/// Called when a client disconnects
#[reducer(client_disconnected)]
pub fn client_disconnected(ctx: &ReducerContext) {
    log::info!("Client disconnected: {:?}", ctx.sender);
    if let Some(session) = ctx.db.online_player().identity().find(ctx.sender) {
        ctx.db.online_player().identity().delete(session.identity);
    }
}

// ============================================================================
// PLAYER REDUCERS
// ============================================================================

/// Create the caller's player in the active season, in the lowest sector.
#[reducer]
pub fn join_game(ctx: &ReducerContext, username: String) -> Result<(), String> {
    if ctx.db.player().identity().find(ctx.sender).is_some() {
        return Err("You already have a player".to_string());
    }
    let username = sanitize_single_line(&username);
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(format!(
            "Username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"
        ));
    }
    let wanted = username.to_lowercase();
    if ctx
        .db
        .player()
        .iter()
        .any(|p| p.username.to_lowercase() == wanted)
    {
        return Err("Username is taken".to_string());
    }

    let season = ctx
        .db
        .season()
        .iter()
        .max_by_key(|s| s.id)
        .ok_or("No active season")?;
    let start = ctx
        .db
        .sector()
        .iter()
        .map(|s| s.id)
        .min()
        .ok_or("The universe has no sectors")?;

    let config = load_config(ctx);
    let now = now_secs(ctx);
    let season_model = m::Season {
        id: season.id,
        name: season.name,
        started_at: season.started_at,
    };
    let p = config.new_player(0, &username, start, &season_model, now);
    let row = ctx
        .db
        .player()
        .try_insert(Player {
            id: 0,
            identity: ctx.sender,
            username: p.username,
            is_admin: p.is_admin,
            must_change_password: p.must_change_password,
            credits: p.credits,
            xp: p.xp,
            level: p.level,
            ship_type: p.ship.as_str().to_string(),
            cargo_upgrades: p.cargo_upgrades,
            turn_upgrades: p.turn_upgrades,
            turns: p.turns,
            turns_max: p.turns_max,
            sector_id: p.sector_id,
            cargo_max: p.cargo_max,
            cargo_ore: p.cargo.ore,
            cargo_organics: p.cargo.organics,
            cargo_equipment: p.cargo.equipment,
            last_turn_regen: p.last_turn_regen,
            season_id: p.season_id,
            created_at: ctx.timestamp,
        })
        .map_err(|e| format!("Failed to create player: {e}"))?;

    DbStore::new(ctx)
        .mark_discovered(row.id, start)
        .map_err(|e| e.to_string())?;
    if let Some(session) = ctx.db.online_player().identity().find(ctx.sender) {
        ctx.db.online_player().identity().update(OnlinePlayer {
            player_id: Some(row.id),
            ..session
        });
    }
    log::info!("Player {} joined as #{} in sector {start}", row.username, row.id);
    Ok(())
}

/// Run one command for the caller and publish the response.
///
/// Rejected commands still commit (with the turn regen only); infrastructure
/// failures return `Err` so the whole transaction rolls back.
#[reducer]
pub fn submit_command(ctx: &ReducerContext, request_json: String) -> Result<(), String> {
    let request: CommandRequest =
        serde_json::from_str(&request_json).map_err(|e| format!("Malformed command: {e}"))?;
    let player = ctx
        .db
        .player()
        .identity()
        .find(ctx.sender)
        .ok_or("Join the game first")?;

    let config = load_config(ctx);
    let mut store = DbStore::new(ctx);
    let response = execute_command(&mut store, player.id, &request, &config, now_secs(ctx))
        .map_err(|e| {
            log::warn!("command {} for player {} failed: {e}", request.command_type, player.id);
            e.to_string()
        })?;

    let payload = serde_json::to_string(&response).map_err(|e| e.to_string())?;
    let result = CommandResult {
        player_id: player.id,
        identity: ctx.sender,
        payload,
        at: ctx.timestamp,
    };
    if ctx.db.command_result().player_id().find(player.id).is_some() {
        ctx.db.command_result().player_id().update(result);
    } else {
        ctx.db.command_result().insert(result);
    }
    Ok(())
}

// ============================================================================
// ADMIN REDUCERS
// ============================================================================

/// Replace the game settings with a (possibly partial) JSON document.
#[reducer]
pub fn update_config(ctx: &ReducerContext, settings_json: String) -> Result<(), String> {
    require_admin(ctx)?;
    let config = GameConfig::from_json(&settings_json).map_err(|e| format!("Invalid config: {e}"))?;
    let settings = config.to_json().map_err(|e| e.to_string())?;
    match ctx.db.game_config().id().find(0) {
        Some(row) => {
            ctx.db.game_config().id().update(GameConfigRow { settings, ..row });
        }
        None => {
            ctx.db.game_config().insert(GameConfigRow {
                id: 0,
                owner: ctx.sender,
                settings,
            });
        }
    }
    log::info!("Game config updated by {:?}", ctx.sender);
    schedule_tickers(ctx, &config)
}

#[reducer]
pub fn set_player_flags(
    ctx: &ReducerContext,
    player_id: u64,
    is_admin: bool,
    must_change_password: bool,
) -> Result<(), String> {
    require_admin(ctx)?;
    let row = ctx
        .db
        .player()
        .id()
        .find(player_id)
        .ok_or_else(|| format!("Player {player_id} not found"))?;
    ctx.db.player().id().update(Player {
        is_admin,
        must_change_password,
        ..row
    });
    Ok(())
}

/// Load a pre-built universe. Sectors and ports with the same ids are replaced.
#[reducer]
pub fn import_universe(ctx: &ReducerContext, universe_json: String) -> Result<(), String> {
    require_admin(ctx)?;
    let universe = Universe::from_json(&universe_json).map_err(|e| e.to_string())?;

    for s in &universe.sectors {
        if ctx.db.sector().id().find(s.id).is_some() {
            ctx.db.sector().id().delete(s.id);
        }
        ctx.db.sector().insert(Sector {
            id: s.id,
            name: s.name.clone(),
            is_protectorate: s.is_protectorate,
            protectorate_fighters: s.protectorate_fighters,
        });
    }

    let existing: HashSet<(u32, u32)> = ctx
        .db
        .warp()
        .iter()
        .map(|w| (w.from_sector, w.to_sector))
        .collect();
    let mut added = 0;
    for (from, to) in universe.edges() {
        if existing.contains(&(from, to)) {
            continue;
        }
        ctx.db.warp().insert(Warp {
            id: 0,
            from_sector: from,
            to_sector: to,
        });
        added += 1;
    }

    for port in &universe.ports {
        if ctx.db.port().sector_id().find(port.sector_id).is_some() {
            ctx.db.port().sector_id().delete(port.sector_id);
        }
        ctx.db.port().insert(port_row(port));
    }

    log::info!(
        "Imported {} sectors, {added} warps, {} ports",
        universe.sectors.len(),
        universe.ports.len()
    );
    Ok(())
}
