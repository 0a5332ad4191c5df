//! The command engine.
//!
//! [`execute_command`] runs one player command inside the caller's
//! transaction:
//!
//! 1. load the player and apply turn regen
//! 2. refuse gameplay while a password change is pending
//! 3. charge the turn cost (admins play free)
//! 4. dispatch to the sub-command
//! 5. award XP, persist the player and its log lines, and build the response
//!
//! Sub-commands validate everything before their first write and return an
//! [`Outcome`]. A rejection keeps only the regen result. A [`StoreError`] is
//! returned as [`EngineError`] and the caller must roll the transaction back.

mod corp;
mod info;
mod mine;
mod navigation;
mod planet;
mod shipyard;
mod trade;

use thiserror::Error;

use crate::command::{Command, CommandRequest};
use crate::config::{GameConfig, MAX_RECENT_LOGS};
use crate::model::{LogKind, Player, PlayerId};
use crate::progression::{award_xp, xp_gain};
use crate::regen::regen_turns;
use crate::store::{GameStore, StoreError};
use crate::view::{load_sector_view, CommandResponse, PlayerState};

/// Infrastructure failure while executing a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stable machine-readable rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotEnoughTurns,
    PasswordChangeRequired,
    UnknownCommand,
    UnknownSubcommand,
    InvalidMove,
    TradeError,
    InvalidName,
    AlreadyOwned,
    InsufficientCredits,
    InvalidCommodity,
    InvalidQty,
    NoPlanet,
    NoAccess,
    NoCargoSpace,
    InsufficientStored,
    InsufficientCargo,
    StorageFull,
    MaxLevel,
    AlreadyInCorp,
    NameUnavailable,
    InvalidArgs,
    NotFound,
    NotInCorp,
    Forbidden,
    InsufficientFunds,
    ProtectoratePeace,
    InsufficientEquipment,
    NoShipyard,
    InvalidShip,
    CargoTooLarge,
    MaxUpgrades,
    InvalidUpgrade,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotEnoughTurns => "NOT_ENOUGH_TURNS",
            ErrorCode::PasswordChangeRequired => "PASSWORD_CHANGE_REQUIRED",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::UnknownSubcommand => "UNKNOWN_SUBCOMMAND",
            ErrorCode::InvalidMove => "INVALID_MOVE",
            ErrorCode::TradeError => "TRADE_ERROR",
            ErrorCode::InvalidName => "INVALID_NAME",
            ErrorCode::AlreadyOwned => "ALREADY_OWNED",
            ErrorCode::InsufficientCredits => "INSUFFICIENT_CREDITS",
            ErrorCode::InvalidCommodity => "INVALID_COMMODITY",
            ErrorCode::InvalidQty => "INVALID_QTY",
            ErrorCode::NoPlanet => "NO_PLANET",
            ErrorCode::NoAccess => "NO_ACCESS",
            ErrorCode::NoCargoSpace => "NO_CARGO_SPACE",
            ErrorCode::InsufficientStored => "INSUFFICIENT_STORED",
            ErrorCode::InsufficientCargo => "INSUFFICIENT_CARGO",
            ErrorCode::StorageFull => "STORAGE_FULL",
            ErrorCode::MaxLevel => "MAX_LEVEL",
            ErrorCode::AlreadyInCorp => "ALREADY_IN_CORP",
            ErrorCode::NameUnavailable => "NAME_UNAVAILABLE",
            ErrorCode::InvalidArgs => "INVALID_ARGS",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::NotInCorp => "NOT_IN_CORP",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::ProtectoratePeace => "PROTECTORATE_PEACE",
            ErrorCode::InsufficientEquipment => "INSUFFICIENT_EQUIPMENT",
            ErrorCode::NoShipyard => "NO_SHIPYARD",
            ErrorCode::InvalidShip => "INVALID_SHIP",
            ErrorCode::CargoTooLarge => "CARGO_TOO_LARGE",
            ErrorCode::MaxUpgrades => "MAX_UPGRADES",
            ErrorCode::InvalidUpgrade => "INVALID_UPGRADE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Done {
        message: String,
        logs: Vec<(LogKind, String)>,
    },
    Rejected {
        code: ErrorCode,
        message: String,
    },
}

impl Outcome {
    /// Success whose message is also the single log line.
    pub(crate) fn logged(kind: LogKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Outcome::Done {
            logs: vec![(kind, message.clone())],
            message,
        }
    }

    /// Success with no log line.
    pub(crate) fn silent(message: impl Into<String>) -> Self {
        Outcome::Done {
            message: message.into(),
            logs: Vec::new(),
        }
    }

    pub(crate) fn reject(code: ErrorCode, message: impl Into<String>) -> Self {
        Outcome::Rejected {
            code,
            message: message.into(),
        }
    }
}

pub(crate) type EngineResult<T> = Result<T, EngineError>;

/// Execute one command for `player_id` at time `now`.
pub fn execute_command<S: GameStore + ?Sized>(
    store: &mut S,
    player_id: PlayerId,
    request: &CommandRequest,
    config: &GameConfig,
    now: i64,
) -> EngineResult<CommandResponse> {
    let command = Command::parse(request);
    let mut player = store.load_player_for_update(player_id)?;
    regen_turns(&mut player, config.regen_seconds(), now);
    let regen_only = player.clone();

    if player.must_change_password {
        return reject(
            store,
            regen_only,
            ErrorCode::PasswordChangeRequired,
            "Password change required. Use the Change Password form.".into(),
            config,
            now,
        );
    }

    let cost = if player.is_admin {
        0
    } else {
        command.turn_cost()
    };
    if player.turns < cost {
        return reject(
            store,
            regen_only,
            ErrorCode::NotEnoughTurns,
            "Not enough turns.".into(),
            config,
            now,
        );
    }
    player.turns -= cost;

    match dispatch(store, &mut player, &command, now)? {
        Outcome::Rejected { code, message } => {
            reject(store, regen_only, code, message, config, now)
        }
        Outcome::Done {
            mut message,
            mut logs,
        } => {
            let gained = xp_gain(command.type_code(), command.action_code(), cost);
            if let Some(rank_up) = award_xp(&mut player, gained) {
                let announcement = rank_up.announcement();
                log::info!("player {} reached level {}", player.id, rank_up.to);
                message.push('\n');
                message.push_str(&announcement);
                logs.push((LogKind::System, announcement));
            }

            store.save_player(&player)?;
            let mut logged = false;
            for (kind, text) in logs.iter().filter(|(_, t)| !t.is_empty()) {
                store.insert_log(player.id, *kind, text, now)?;
                logged = true;
            }
            if logged {
                store.prune_logs(player.id, MAX_RECENT_LOGS)?;
            }
            log::debug!(
                "player {} ran {} {} (cost {cost})",
                player.id,
                command.type_code(),
                command.action_code()
            );
            respond(store, &player, message, None, config, now)
        }
    }
}

fn dispatch<S: GameStore + ?Sized>(
    store: &mut S,
    player: &mut Player,
    command: &Command,
    now: i64,
) -> EngineResult<Outcome> {
    match command {
        Command::Scan => navigation::scan(store, player, now),
        Command::Move { to } => navigation::move_to(store, player, *to, now),
        Command::Trade {
            side,
            commodity,
            quantity,
        } => trade::trade(store, player, *side, *commodity, *quantity, now),
        Command::Planet(cmd) => planet::run(store, player, cmd),
        Command::Corp(cmd) => corp::run(store, player, cmd, now),
        Command::Mine(cmd) => mine::run(store, player, cmd, now),
        Command::Shipyard(cmd) => shipyard::run(store, player, cmd),
        Command::Market { filter } => info::market(store, player, *filter, now),
        Command::Route { filter } => info::route(store, player, *filter, now),
        Command::Events => info::events(store, player, now),
        Command::Rankings => info::rankings(store, player),
        Command::Season => info::season(store, player),
        Command::Help => Ok(info::help()),
        Command::Unknown => Ok(Outcome::reject(ErrorCode::UnknownCommand, "Unknown command.")),
    }
}

/// Commit only the regen result and report the rejection.
fn reject<S: GameStore + ?Sized>(
    store: &mut S,
    regen_only: Player,
    code: ErrorCode,
    message: String,
    config: &GameConfig,
    now: i64,
) -> EngineResult<CommandResponse> {
    log::info!("player {} command rejected: {code}", regen_only.id);
    store.save_player(&regen_only)?;
    respond(store, &regen_only, message, Some(code), config, now)
}

fn respond<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
    message: String,
    error: Option<ErrorCode>,
    config: &GameConfig,
    now: i64,
) -> EngineResult<CommandResponse> {
    let sector = load_sector_view(store, player.sector_id, now)?;
    let logs = store.recent_logs(player.id, config.recent_log_limit.clamp(1, MAX_RECENT_LOGS))?;
    Ok(CommandResponse {
        ok: error.is_none(),
        message,
        error: error.map(|c| c.as_str().to_string()),
        state: PlayerState::from(player),
        sector,
        logs,
    })
}
