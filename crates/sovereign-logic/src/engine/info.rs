//! Free informational commands: MARKET, ROUTE, EVENTS, RANKINGS, SEASON and
//! HELP. Each reads, never writes, and logs its text as a SYSTEM line.

use std::collections::HashSet;

use super::{EngineResult, Outcome};
use crate::command::help_text;
use crate::commodity::Commodity;
use crate::format::{format_duration_short, format_rfc3339};
use crate::market::market_report;
use crate::model::{LogKind, Player};
use crate::route::{route_report, WarpGraph};
use crate::store::GameStore;

const EVENTS_LIMIT: usize = 20;
const RANKINGS_LIMIT: usize = 10;

fn system(text: String) -> EngineResult<Outcome> {
    Ok(Outcome::logged(LogKind::System, text))
}

pub(super) fn market<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
    filter: Option<Commodity>,
    now: i64,
) -> EngineResult<Outcome> {
    let intel = store.intel_for_player(player.id)?;
    system(market_report(now, &intel, filter))
}

pub(super) fn route<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
    filter: Option<Commodity>,
    now: i64,
) -> EngineResult<Outcome> {
    let intel = store.intel_for_player(player.id)?;
    let discovered = store.discovered_sectors(player.id)?;
    let warps = store.warps_among(&discovered)?;
    let graph = WarpGraph::from_discovered(&discovered, &warps);
    system(route_report(
        now,
        player.sector_id,
        player.cargo_max,
        &graph,
        &intel,
        filter,
    ))
}

pub(super) fn events<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
    now: i64,
) -> EngineResult<Outcome> {
    let known: HashSet<_> = store.discovered_sectors(player.id)?.into_iter().collect();
    let visible: Vec<_> = store
        .active_events(now)?
        .into_iter()
        .filter(|e| known.contains(&e.sector_id))
        .take(EVENTS_LIMIT)
        .collect();
    if visible.is_empty() {
        return system("No known active events right now.".to_string());
    }

    let mut lines = vec!["Active events (known sectors):".to_string()];
    for event in &visible {
        let sector_name = store
            .sector(event.sector_id)?
            .map(|s| s.name)
            .unwrap_or_default();
        lines.push(format!(
            "- [{}] Sector {} ({sector_name}): {} (ends in {}) | {}",
            event.kind.as_str(),
            event.sector_id,
            event.title,
            format_duration_short((event.ends_at - now).max(0)),
            event.effect_summary()
        ));
        let description = event.description.trim();
        if !description.is_empty() {
            lines.push(format!("  {description}"));
        }
    }
    system(lines.join("\n"))
}

pub(super) fn rankings<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
) -> EngineResult<Outcome> {
    let rows = store.rankings(player.season_id, RANKINGS_LIMIT)?;
    let mut lines = vec![format!("Rankings ({})", player.season_name)];
    if rows.is_empty() {
        lines.push("No rankings yet.".to_string());
    }
    for (i, row) in rows.iter().enumerate() {
        let label = match &row.corp_name {
            Some(corp) => format!("{} [{corp}]", row.username),
            None => row.username.clone(),
        };
        lines.push(format!("{}. {label} - {}", i + 1, row.credits));
    }
    system(lines.join("\n"))
}

pub(super) fn season<S: GameStore + ?Sized>(
    store: &mut S,
    player: &Player,
) -> EngineResult<Outcome> {
    let started = store
        .season(player.season_id)?
        .map(|s| format_rfc3339(s.started_at))
        .unwrap_or_else(|| "-".to_string());
    system(format!(
        "Current season: {} (ID {})\nStarted: {started}",
        player.season_name, player.season_id
    ))
}

pub(super) fn help() -> Outcome {
    Outcome::logged(LogKind::System, help_text())
}
