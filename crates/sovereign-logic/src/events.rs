//! Sector events: time-boxed price distortions and raider invasions.
//!
//! The event ticker expires old events, then occasionally rolls a new one.
//! Price events (ANOMALY, LIMITED) feed into [`crate::pricing`]; INVASION only
//! costs credits on entry and never touches prices.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::commodity::Commodity;
use crate::format::format_duration_short;
use crate::model::{LogKind, SectorId};
use crate::pricing::{MAX_PRICE_PERCENT, MIN_PRICE_PERCENT};

/// The ticker stops spawning once this many events are active.
pub const MAX_ACTIVE_EVENTS: usize = 5;
/// Chance per tick of attempting to spawn an event.
pub const SPAWN_CHANCE: f64 = 0.35;
/// Invasion entry penalty per severity point.
pub const INVASION_PENALTY_PER_SEVERITY: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Anomaly,
    Limited,
    Invasion,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Anomaly => "ANOMALY",
            EventKind::Limited => "LIMITED",
            EventKind::Invasion => "INVASION",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ANOMALY" => Some(EventKind::Anomaly),
            "LIMITED" => Some(EventKind::Limited),
            "INVASION" => Some(EventKind::Invasion),
            _ => None,
        }
    }

    pub fn affects_prices(self) -> bool {
        matches!(self, EventKind::Anomaly | EventKind::Limited)
    }
}

/// A time-windowed modifier on one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub id: u64,
    pub kind: EventKind,
    pub sector_id: SectorId,
    /// `None` means the event covers every commodity.
    pub scope: Option<Commodity>,
    pub price_percent: i32,
    pub severity: u32,
    pub title: String,
    pub description: String,
    pub started_at: i64,
    pub ends_at: i64,
}

/// What happens to a player who moves into an event sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryEffect {
    pub message: String,
    pub log_kind: LogKind,
    pub credits_lost: i64,
}

impl ActiveEvent {
    pub fn is_active(&self, now: i64) -> bool {
        self.ends_at > now
    }

    /// Scope label as shown to players ("ORE", "ALL").
    pub fn scope_label(&self) -> &'static str {
        self.scope.map_or("ALL", Commodity::as_str)
    }

    /// Price percent this event imposes on `commodity`; 100 when it does not apply.
    pub fn price_percent_for(&self, commodity: Commodity) -> i32 {
        if !self.kind.affects_prices() {
            return 100;
        }
        let percent = self.price_percent;
        if !(MIN_PRICE_PERCENT..=MAX_PRICE_PERCENT).contains(&percent) {
            return 100;
        }
        match self.scope {
            None => percent,
            Some(c) if c == commodity => percent,
            Some(_) => 100,
        }
    }

    pub fn invasion_penalty(&self) -> i64 {
        i64::from(self.severity) * INVASION_PENALTY_PER_SEVERITY
    }

    /// Entry effect for a player holding `credits`. The penalty never exceeds `credits`.
    pub fn entry_effect(&self, credits: i64, now: i64) -> EntryEffect {
        match self.kind {
            EventKind::Invasion => {
                let penalty = self.invasion_penalty().clamp(0, credits.max(0));
                EntryEffect {
                    message: format!(
                        "Invasion alert: {}. Raiders seize {} credits.",
                        self.title, penalty
                    ),
                    log_kind: LogKind::Combat,
                    credits_lost: penalty,
                }
            }
            EventKind::Anomaly | EventKind::Limited => EntryEffect {
                message: format!(
                    "Event active: {} (ends in {}).",
                    self.title,
                    format_duration_short(self.ends_at - now)
                ),
                log_kind: LogKind::System,
                credits_lost: 0,
            },
        }
    }

    /// Short effect summary for the EVENTS listing.
    pub fn effect_summary(&self) -> String {
        match self.kind {
            EventKind::Anomaly | EventKind::Limited => {
                format!("prices {}% ({})", self.price_percent, self.scope_label())
            }
            EventKind::Invasion => {
                format!("entry penalty ~{} credits", self.invasion_penalty())
            }
        }
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Whether this tick should try to spawn an event.
pub fn should_spawn(active_count: usize, rng: &mut impl Rng) -> bool {
    if active_count >= MAX_ACTIVE_EVENTS {
        return false;
    }
    rng.gen::<f64>() <= SPAWN_CHANCE
}

/// Roll the kind: 60% ANOMALY, 25% INVASION, 15% LIMITED.
pub fn roll_kind(rng: &mut impl Rng) -> EventKind {
    let roll = rng.gen_range(0..100);
    if roll < 60 {
        EventKind::Anomaly
    } else if roll < 85 {
        EventKind::Invasion
    } else {
        EventKind::Limited
    }
}

/// Roll a new event. INVASION lands on any sector, price events only on port
/// sectors. Returns `None` when there is no candidate or the chosen sector is
/// already `busy`. The returned event has `id` 0.
pub fn roll_event(
    rng: &mut impl Rng,
    sectors: &[SectorId],
    port_sectors: &[SectorId],
    busy: impl Fn(SectorId) -> bool,
    now: i64,
) -> Option<ActiveEvent> {
    let kind = roll_kind(rng);
    let candidates = match kind {
        EventKind::Invasion => sectors,
        EventKind::Anomaly | EventKind::Limited => port_sectors,
    };
    if candidates.is_empty() {
        return None;
    }
    let sector_id = candidates[rng.gen_range(0..candidates.len())];
    if busy(sector_id) {
        return None;
    }

    let (scope, price_percent, severity, title, description, minutes) = match kind {
        EventKind::Anomaly => {
            let commodity = Commodity::ALL[rng.gen_range(0..Commodity::ALL.len())];
            let (percent, title, description) = if rng.gen_range(0..2) == 0 {
                (
                    80 + rng.gen_range(0..11),
                    format!("{} Glut", commodity.as_str()),
                    format!(
                        "A sudden surplus has depressed {} prices in this sector.",
                        commodity.noun()
                    ),
                )
            } else {
                (
                    115 + rng.gen_range(0..26),
                    format!("{} Spike", commodity.as_str()),
                    format!(
                        "Demand is surging; {} prices are elevated in this sector.",
                        commodity.noun()
                    ),
                )
            };
            let severity = 1 + rng.gen_range(0..2);
            let minutes = 20 + rng.gen_range(0..41);
            (Some(commodity), percent, severity, title, description, minutes)
        }
        EventKind::Limited => (
            None,
            85 + rng.gen_range(0..31),
            1,
            "Transient Market".to_string(),
            "A short-lived market distortion is affecting local prices.".to_string(),
            10 + rng.gen_range(0..21),
        ),
        EventKind::Invasion => (
            None,
            100,
            1 + rng.gen_range(0..3),
            "Raider Invasion".to_string(),
            "Hostile raiders are harassing traffic in this sector. Entry may cost credits."
                .to_string(),
            15 + rng.gen_range(0..46),
        ),
    };

    Some(ActiveEvent {
        id: 0,
        kind,
        sector_id,
        scope,
        price_percent,
        severity,
        title,
        description,
        started_at: now,
        ends_at: now + i64::from(minutes) * 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn event(
        kind: EventKind,
        scope: Option<Commodity>,
        percent: i32,
        severity: u32,
    ) -> ActiveEvent {
        ActiveEvent {
            id: 1,
            kind,
            sector_id: 3,
            scope,
            price_percent: percent,
            severity,
            title: "Test".into(),
            description: String::new(),
            started_at: 0,
            ends_at: 600,
        }
    }

    #[test]
    fn scoped_anomaly_only_hits_its_commodity() {
        let e = event(EventKind::Anomaly, Some(Commodity::Ore), 80, 1);
        assert_eq!(e.price_percent_for(Commodity::Ore), 80);
        assert_eq!(e.price_percent_for(Commodity::Organics), 100);
    }

    #[test]
    fn invasion_never_affects_prices() {
        let e = event(EventKind::Invasion, None, 250, 3);
        assert_eq!(e.price_percent_for(Commodity::Ore), 100);
    }

    #[test]
    fn out_of_range_percent_is_ignored() {
        let e = event(EventKind::Limited, None, 500, 1);
        assert_eq!(e.price_percent_for(Commodity::Equipment), 100);
        let e = event(EventKind::Limited, None, 5, 1);
        assert_eq!(e.price_percent_for(Commodity::Equipment), 100);
    }

    #[test]
    fn invasion_penalty_capped_at_credits() {
        let e = event(EventKind::Invasion, None, 100, 3);
        let effect = e.entry_effect(1_000, 0);
        assert_eq!(effect.credits_lost, 600);
        assert_eq!(effect.log_kind, LogKind::Combat);
        assert_eq!(effect.message, "Invasion alert: Test. Raiders seize 600 credits.");

        let broke = e.entry_effect(150, 0);
        assert_eq!(broke.credits_lost, 150);
    }

    #[test]
    fn price_event_entry_is_informational() {
        let e = event(EventKind::Anomaly, Some(Commodity::Ore), 120, 1);
        let effect = e.entry_effect(1_000, 0);
        assert_eq!(effect.credits_lost, 0);
        assert_eq!(effect.message, "Event active: Test (ends in 10m).");
    }

    #[test]
    fn effect_summaries() {
        assert_eq!(
            event(EventKind::Anomaly, Some(Commodity::Organics), 85, 1).effect_summary(),
            "prices 85% (ORGANICS)"
        );
        assert_eq!(
            event(EventKind::Invasion, None, 100, 2).effect_summary(),
            "entry penalty ~400 credits"
        );
    }

    #[test]
    fn no_spawn_at_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(!should_spawn(MAX_ACTIVE_EVENTS, &mut rng));
        }
    }

    #[test]
    fn rolled_events_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let sectors = [1, 2, 3, 4];
        let ports = [2, 4];
        for _ in 0..500 {
            let Some(e) = roll_event(&mut rng, &sectors, &ports, |_| false, 1_000) else {
                continue;
            };
            let minutes = (e.ends_at - e.started_at) / 60;
            match e.kind {
                EventKind::Anomaly => {
                    assert!(ports.contains(&e.sector_id));
                    assert!(e.scope.is_some());
                    assert!(
                        (80..=90).contains(&e.price_percent)
                            || (115..=140).contains(&e.price_percent)
                    );
                    assert!((1..=2).contains(&e.severity));
                    assert!((20..=60).contains(&minutes));
                }
                EventKind::Limited => {
                    assert!(ports.contains(&e.sector_id));
                    assert_eq!(e.scope, None);
                    assert!((85..=115).contains(&e.price_percent));
                    assert!((10..=30).contains(&minutes));
                }
                EventKind::Invasion => {
                    assert_eq!(e.price_percent, 100);
                    assert!((1..=3).contains(&e.severity));
                    assert!((15..=60).contains(&minutes));
                }
            }
        }
    }

    #[test]
    fn busy_sector_is_skipped() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(roll_event(&mut rng, &[5], &[5], |s| s == 5, 0).is_none());
        }
    }
}
