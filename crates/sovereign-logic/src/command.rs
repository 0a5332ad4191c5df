//! Command requests and their parsed, typed form.
//!
//! Clients send a loose [`CommandRequest`]; the engine normalizes it and parses
//! it into a [`Command`] once, so turn cost, XP and dispatch all match on the
//! same variant.

use serde::{Deserialize, Serialize};

use crate::commodity::Commodity;

/// Wire shape of a submitted command. Every field but `type` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandRequest {
    #[serde(rename = "type")]
    pub command_type: String,
    pub to: i64,
    pub action: String,
    pub commodity: String,
    pub quantity: i64,
    pub name: String,
    pub text: String,
}

impl CommandRequest {
    pub fn new(command_type: &str) -> Self {
        Self {
            command_type: command_type.to_string(),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    pub fn with_commodity(mut self, commodity: &str) -> Self {
        self.commodity = commodity.to_string();
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_to(mut self, to: i64) -> Self {
        self.to = to;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Trim every string field and upper-case the type, action and commodity.
    pub fn normalized(&self) -> Self {
        Self {
            command_type: self.command_type.trim().to_uppercase(),
            to: self.to,
            action: self.action.trim().to_uppercase(),
            commodity: self.commodity.trim().to_uppercase(),
            quantity: self.quantity,
            name: self.name.trim().to_string(),
            text: self.text.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn verb_past(self) -> &'static str {
        match self {
            TradeSide::Buy => "bought",
            TradeSide::Sell => "sold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanetCommand {
    Info,
    Colonize { name: String },
    Load { commodity: Option<Commodity>, quantity: i64 },
    Unload { commodity: Option<Commodity>, quantity: i64 },
    UpgradeCitadel,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpCommand {
    Info,
    Create { name: String },
    Join { name: String },
    Leave,
    Say { text: String },
    Deposit { amount: i64 },
    Withdraw { amount: i64 },
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineCommand {
    Info,
    Deploy { quantity: i64 },
    Sweep,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipyardCommand {
    Info,
    /// Upper-cased ship code; empty when the client sent none.
    Buy { ship: String },
    Sell,
    /// Upper-cased upgrade target; empty when the client sent none.
    Upgrade { target: String },
    Unknown,
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan,
    Move {
        to: i64,
    },
    Trade {
        side: Option<TradeSide>,
        commodity: Option<Commodity>,
        quantity: i64,
    },
    Planet(PlanetCommand),
    Corp(CorpCommand),
    Mine(MineCommand),
    Shipyard(ShipyardCommand),
    Market {
        filter: Option<Commodity>,
    },
    Route {
        filter: Option<Commodity>,
    },
    Events,
    Rankings,
    Season,
    Help,
    Unknown,
}

impl Command {
    /// Normalize and parse a request. Never fails: bad input becomes an
    /// `Unknown` variant or a `None` field that the engine rejects.
    pub fn parse(request: &CommandRequest) -> Self {
        let req = request.normalized();
        let commodity = Commodity::parse(&req.commodity);
        let action = req.action.as_str();
        match req.command_type.as_str() {
            "SCAN" => Command::Scan,
            "MOVE" => Command::Move { to: req.to },
            "TRADE" => Command::Trade {
                side: match action {
                    "BUY" => Some(TradeSide::Buy),
                    "SELL" => Some(TradeSide::Sell),
                    _ => None,
                },
                commodity,
                quantity: req.quantity,
            },
            "PLANET" => Command::Planet(match action {
                "" | "INFO" => PlanetCommand::Info,
                "COLONIZE" => PlanetCommand::Colonize { name: req.name },
                "LOAD" => PlanetCommand::Load {
                    commodity,
                    quantity: req.quantity,
                },
                "UNLOAD" => PlanetCommand::Unload {
                    commodity,
                    quantity: req.quantity,
                },
                "UPGRADE_CITADEL" => PlanetCommand::UpgradeCitadel,
                "UPGRADE" if req.name.eq_ignore_ascii_case("CITADEL") => {
                    PlanetCommand::UpgradeCitadel
                }
                _ => PlanetCommand::Unknown,
            }),
            "CORP" => Command::Corp(match action {
                "" | "INFO" => CorpCommand::Info,
                "CREATE" => CorpCommand::Create { name: req.name },
                "JOIN" => CorpCommand::Join { name: req.name },
                "LEAVE" => CorpCommand::Leave,
                "SAY" => CorpCommand::Say { text: req.text },
                "DEPOSIT" => CorpCommand::Deposit {
                    amount: req.quantity,
                },
                "WITHDRAW" => CorpCommand::Withdraw {
                    amount: req.quantity,
                },
                _ => CorpCommand::Unknown,
            }),
            "MINE" => Command::Mine(match action {
                "" | "INFO" => MineCommand::Info,
                "DEPLOY" => MineCommand::Deploy {
                    quantity: req.quantity,
                },
                "SWEEP" => MineCommand::Sweep,
                _ => MineCommand::Unknown,
            }),
            "SHIPYARD" => Command::Shipyard(match action {
                "" | "INFO" => ShipyardCommand::Info,
                "BUY" => ShipyardCommand::Buy {
                    ship: req.name.to_uppercase(),
                },
                "SELL" => ShipyardCommand::Sell,
                "UPGRADE" => ShipyardCommand::Upgrade {
                    target: req.name.to_uppercase(),
                },
                _ => ShipyardCommand::Unknown,
            }),
            "MARKET" => Command::Market { filter: commodity },
            "ROUTE" => Command::Route { filter: commodity },
            "EVENTS" => Command::Events,
            "RANKINGS" => Command::Rankings,
            "SEASON" => Command::Season,
            "HELP" => Command::Help,
            _ => Command::Unknown,
        }
    }

    /// Turns charged to a non-admin player.
    pub fn turn_cost(&self) -> u32 {
        match self {
            Command::Scan | Command::Move { .. } | Command::Trade { .. } => 1,
            Command::Planet(PlanetCommand::Colonize { .. }) => 5,
            Command::Planet(PlanetCommand::Load { .. } | PlanetCommand::Unload { .. }) => 1,
            Command::Planet(PlanetCommand::UpgradeCitadel) => 2,
            Command::Mine(MineCommand::Deploy { .. } | MineCommand::Sweep) => 1,
            _ => 0,
        }
    }

    /// Normalized command type, as used for XP lookup and logging.
    pub fn type_code(&self) -> &'static str {
        match self {
            Command::Scan => "SCAN",
            Command::Move { .. } => "MOVE",
            Command::Trade { .. } => "TRADE",
            Command::Planet(_) => "PLANET",
            Command::Corp(_) => "CORP",
            Command::Mine(_) => "MINE",
            Command::Shipyard(_) => "SHIPYARD",
            Command::Market { .. } => "MARKET",
            Command::Route { .. } => "ROUTE",
            Command::Events => "EVENTS",
            Command::Rankings => "RANKINGS",
            Command::Season => "SEASON",
            Command::Help => "HELP",
            Command::Unknown => "UNKNOWN",
        }
    }

    /// Normalized sub-action, or `""` for commands without one.
    pub fn action_code(&self) -> &'static str {
        match self {
            Command::Trade { side, .. } => match side {
                Some(TradeSide::Buy) => "BUY",
                Some(TradeSide::Sell) => "SELL",
                None => "",
            },
            Command::Planet(p) => match p {
                PlanetCommand::Info => "INFO",
                PlanetCommand::Colonize { .. } => "COLONIZE",
                PlanetCommand::Load { .. } => "LOAD",
                PlanetCommand::Unload { .. } => "UNLOAD",
                PlanetCommand::UpgradeCitadel => "UPGRADE_CITADEL",
                PlanetCommand::Unknown => "",
            },
            Command::Corp(c) => match c {
                CorpCommand::Info => "INFO",
                CorpCommand::Create { .. } => "CREATE",
                CorpCommand::Join { .. } => "JOIN",
                CorpCommand::Leave => "LEAVE",
                CorpCommand::Say { .. } => "SAY",
                CorpCommand::Deposit { .. } => "DEPOSIT",
                CorpCommand::Withdraw { .. } => "WITHDRAW",
                CorpCommand::Unknown => "",
            },
            Command::Mine(m) => match m {
                MineCommand::Info => "INFO",
                MineCommand::Deploy { .. } => "DEPLOY",
                MineCommand::Sweep => "SWEEP",
                MineCommand::Unknown => "",
            },
            Command::Shipyard(s) => match s {
                ShipyardCommand::Info => "INFO",
                ShipyardCommand::Buy { .. } => "BUY",
                ShipyardCommand::Sell => "SELL",
                ShipyardCommand::Upgrade { .. } => "UPGRADE",
                ShipyardCommand::Unknown => "",
            },
            _ => "",
        }
    }
}

/// Command reference returned by HELP.
pub fn help_text() -> String {
    [
        "Core: SCAN | MOVE {to} | TRADE {BUY|SELL} {ORE|ORGANICS|EQUIPMENT} {qty}",
        "Planets: PLANET INFO | PLANET COLONIZE [name] | PLANET LOAD {commodity} {qty} | PLANET UNLOAD {commodity} {qty} | PLANET UPGRADE CITADEL",
        "Corporations: CORP INFO | CORP CREATE {name} | CORP JOIN {name} | CORP LEAVE | CORP SAY {message} | CORP DEPOSIT {credits} | CORP WITHDRAW {credits}",
        "Mines: MINE DEPLOY {qty} | MINE SWEEP",
        "Shipyard: SHIPYARD | SHIPYARD BUY {SCOUT|TRADER|FREIGHTER|INTERCEPTOR} | SHIPYARD SELL | SHIPYARD UPGRADE {CARGO|TURNS}",
        "Standings: RANKINGS | SEASON",
        "Intel: MARKET [ORE|ORGANICS|EQUIPMENT] | ROUTE [ORE|ORGANICS|EQUIPMENT] | EVENTS",
    ]
    .join("\n")
}
