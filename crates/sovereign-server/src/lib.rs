//! Sovereign Conquest - SpacetimeDB module
//!
//! Multiplayer space-trading server. Every player command runs inside one
//! reducer transaction through the engine in `sovereign-logic`; clients
//! submit JSON commands and read their latest result back from the
//! `command_result` table.

mod reducers;
mod simulation;
mod store;
mod tables;

pub use reducers::*;
pub use tables::*;
