//! Command engine for Sovereign Conquest.
//!
//! This crate holds the whole turn-based rule set: parsing a player command,
//! charging turns, validating and applying the action, and building the
//! response the client renders. It never talks to a database directly.
//! Persistence goes through the [`store::GameStore`] trait, implemented by the
//! SpacetimeDB module and by [`memory::MemoryStore`] for tests and the
//! simulation harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`combat`] | Mine strike and sweep arithmetic |
//! | [`command`] | Command requests, parsing, turn costs, HELP text |
//! | [`commodity`] | ORE / ORGANICS / EQUIPMENT and per-commodity holds |
//! | [`config`] | Tunable game settings (JSON) and new-player defaults |
//! | [`engine`] | [`engine::execute_command`] and every sub-command |
//! | [`events`] | Sector events: effects, pricing modifiers, generation |
//! | [`format`] | Short durations, ages and RFC 3339 timestamps |
//! | [`intel`] | Per-player port scan snapshots |
//! | [`market`] | MARKET report over scanned intel |
//! | [`memory`] | In-memory [`store::GameStore`] with transactional rollback |
//! | [`model`] | Players, sectors, ports, planets, corps, mines, logs |
//! | [`pricing`] | Scarcity pricing with event percent |
//! | [`progression`] | XP table, levels and rank titles |
//! | [`regen`] | Lazy turn regeneration |
//! | [`route`] | ROUTE planning over discovered warps |
//! | [`rules`] | Name validation and rule constants |
//! | [`ships`] | Ship catalog and upgrade costs |
//! | [`store`] | Persistence trait the engine runs against |
//! | [`ticks`] | Port, planet, protectorate and event ticks |
//! | [`universe`] | Pre-built universe documents (sectors, warps, ports) |
//! | [`view`] | Response DTOs: player state and sector view |

pub mod combat;
pub mod command;
pub mod commodity;
pub mod config;
pub mod engine;
pub mod events;
pub mod format;
pub mod intel;
pub mod market;
pub mod memory;
pub mod model;
pub mod pricing;
pub mod progression;
pub mod regen;
pub mod route;
pub mod rules;
pub mod ships;
pub mod store;
pub mod ticks;
pub mod universe;
pub mod view;

#[cfg(test)]
pub(crate) mod testutil;
