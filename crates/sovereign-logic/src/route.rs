//! Trade route planning over the player's own scanned intel.
//!
//! Distances come from BFS over warps between discovered sectors only. Each
//! (buy port, sell port) pair is scored by profit per turn, discounted by the
//! age of the staler of the two scans. The first best-scoring pair found in
//! commodity order, then intel order, wins.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::commodity::Commodity;
use crate::format::format_age_short;
use crate::intel::PortIntel;
use crate::model::{SectorId, TradeMode};

/// Warp adjacency restricted to the sectors a player has discovered.
#[derive(Debug, Clone, Default)]
pub struct WarpGraph {
    adj: HashMap<SectorId, Vec<SectorId>>,
}

impl WarpGraph {
    /// Keep only warps whose both ends are discovered. Every discovered
    /// sector gets an entry even if it has no usable warps.
    pub fn from_discovered(discovered: &[SectorId], warps: &[(SectorId, SectorId)]) -> Self {
        let known: HashSet<SectorId> = discovered.iter().copied().collect();
        let mut adj: HashMap<SectorId, Vec<SectorId>> =
            known.iter().map(|&s| (s, Vec::new())).collect();
        for &(from, to) in warps {
            if known.contains(&from) && known.contains(&to) {
                adj.entry(from).or_default().push(to);
            }
        }
        Self { adj }
    }

    /// Hop counts from `start` to every reachable sector (including itself).
    pub fn distances_from(&self, start: SectorId) -> HashMap<SectorId, u32> {
        let mut dist = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let here = dist[&node];
            for &next in self.adj.get(&node).map(Vec::as_slice).unwrap_or_default() {
                if dist.contains_key(&next) {
                    continue;
                }
                dist.insert(next, here + 1);
                queue.push_back(next);
            }
        }
        dist
    }
}

/// Score multiplier (per mille) for intel of the given age in seconds.
pub fn freshness_weight(age_seconds: i64) -> i64 {
    match age_seconds.max(0) {
        a if a <= 15 * 60 => 1_000,
        a if a <= 3_600 => 900,
        a if a <= 3 * 3_600 => 750,
        a if a <= 12 * 3_600 => 600,
        _ => 500,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSuggestion {
    pub commodity: Commodity,
    pub buy_sector: SectorId,
    pub buy_sector_name: String,
    pub sell_sector: SectorId,
    pub sell_sector_name: String,
    pub buy_price: i64,
    pub sell_price: i64,
    pub buy_scanned_at: i64,
    pub sell_scanned_at: i64,
    pub moves_to_buy: u32,
    pub moves_buy_to_sell: u32,
    pub total_moves: u32,
    pub total_turns: u32,
    pub trade_qty: u32,
    pub profit_per_unit: i64,
    pub profit_per_trip: i64,
    /// Freshness-weighted profit per turn, scaled by 1000.
    pub score: i64,
}

struct Quote<'a> {
    sector: SectorId,
    name: &'a str,
    price: i64,
    max_qty: u32,
    scanned_at: i64,
}

/// Best route for `cargo_max` units starting at `current`.
///
/// `intel` is evaluated in the given order; `filter` restricts to one commodity.
pub fn best_route(
    now: i64,
    current: SectorId,
    cargo_max: u32,
    graph: &WarpGraph,
    intel: &[PortIntel],
    filter: Option<Commodity>,
) -> Option<RouteSuggestion> {
    let cargo_max = cargo_max.max(1);
    let from_current = graph.distances_from(current);
    let commodities: Vec<Commodity> = match filter {
        Some(c) => vec![c],
        None => Commodity::ALL.to_vec(),
    };

    let mut best: Option<RouteSuggestion> = None;
    let mut from_buy_cache: HashMap<SectorId, HashMap<SectorId, u32>> = HashMap::new();

    for commodity in commodities {
        let mut buys = Vec::new();
        let mut sells = Vec::new();
        for pi in intel {
            let q = pi.quote(commodity);
            match q.mode {
                TradeMode::Sell if q.qty > 0 => buys.push(Quote {
                    sector: pi.sector_id,
                    name: &pi.sector_name,
                    price: q.price,
                    max_qty: q.qty,
                    scanned_at: pi.scanned_at,
                }),
                TradeMode::Buy if q.demand() > 0 => sells.push(Quote {
                    sector: pi.sector_id,
                    name: &pi.sector_name,
                    price: q.price,
                    max_qty: q.demand(),
                    scanned_at: pi.scanned_at,
                }),
                _ => {}
            }
        }
        if buys.is_empty() || sells.is_empty() {
            continue;
        }

        for b in &buys {
            let Some(&to_buy) = from_current.get(&b.sector) else {
                continue;
            };
            let from_buy = from_buy_cache
                .entry(b.sector)
                .or_insert_with(|| graph.distances_from(b.sector));

            for s in &sells {
                if s.sector == b.sector {
                    continue;
                }
                let Some(&to_sell) = from_buy.get(&s.sector) else {
                    continue;
                };
                let profit_per_unit = s.price - b.price;
                if profit_per_unit <= 0 {
                    continue;
                }
                let trade_qty = cargo_max.min(b.max_qty).min(s.max_qty);
                if trade_qty < 1 {
                    continue;
                }

                let total_moves = to_buy + to_sell;
                let total_turns = (total_moves + 2).max(1);
                let profit_per_trip = profit_per_unit * i64::from(trade_qty);
                let raw_score = profit_per_trip * 1_000 / i64::from(total_turns);
                let max_age = (now - b.scanned_at).max(now - s.scanned_at);
                let score = raw_score * freshness_weight(max_age) / 1_000;

                if best.as_ref().is_some_and(|cur| score <= cur.score) {
                    continue;
                }
                best = Some(RouteSuggestion {
                    commodity,
                    buy_sector: b.sector,
                    buy_sector_name: b.name.to_string(),
                    sell_sector: s.sector,
                    sell_sector_name: s.name.to_string(),
                    buy_price: b.price,
                    sell_price: s.price,
                    buy_scanned_at: b.scanned_at,
                    sell_scanned_at: s.scanned_at,
                    moves_to_buy: to_buy,
                    moves_buy_to_sell: to_sell,
                    total_moves,
                    total_turns,
                    trade_qty,
                    profit_per_unit,
                    profit_per_trip,
                    score,
                });
            }
        }
    }
    best
}

/// Player-facing text for a ROUTE command.
pub fn route_report(
    now: i64,
    current: SectorId,
    cargo_max: u32,
    graph: &WarpGraph,
    intel: &[PortIntel],
    filter: Option<Commodity>,
) -> String {
    if intel.is_empty() {
        return "No route intel yet. Use SCAN in sectors with ports to record prices.".to_string();
    }
    let Some(r) = best_route(now, current, cargo_max, graph, intel, filter) else {
        return match filter {
            Some(c) => format!("No profitable {c} route found with current scanned intel."),
            None => "No profitable route found with current scanned intel.".to_string(),
        };
    };
    let per_turn = r.profit_per_trip as f64 / f64::from(r.total_turns.max(1));
    [
        "Route suggestion (uses your scanned intel only):".to_string(),
        format!("Commodity: {}", r.commodity),
        format!(
            "Step 1: Travel to Sector {} ({}) in {} move(s).",
            r.buy_sector, r.buy_sector_name, r.moves_to_buy
        ),
        format!(
            "        Buy at {} credits/unit (scan age {}).",
            r.buy_price,
            format_age_short(now, Some(r.buy_scanned_at))
        ),
        format!(
            "Step 2: Travel to Sector {} ({}) in {} move(s).",
            r.sell_sector, r.sell_sector_name, r.moves_buy_to_sell
        ),
        format!(
            "        Sell at {} credits/unit (scan age {}).",
            r.sell_price,
            format_age_short(now, Some(r.sell_scanned_at))
        ),
        format!(
            "Spread: {}/unit | Qty assumed: {} | Profit/trip: {} credits",
            r.profit_per_unit, r.trade_qty, r.profit_per_trip
        ),
        format!(
            "Moves: {} | Est. turns (moves + 2 trades): {} | Profit/turn: {:.2}",
            r.total_moves, r.total_turns, per_turn
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intel::IntelQuote;

    fn idle() -> IntelQuote {
        IntelQuote {
            mode: TradeMode::Buy,
            qty: 0,
            base_qty: 0,
            price: 0,
        }
    }

    fn ore_intel(
        sector: SectorId,
        mode: TradeMode,
        qty: u32,
        base: u32,
        price: i64,
        at: i64,
    ) -> PortIntel {
        PortIntel {
            sector_id: sector,
            sector_name: format!("S{sector}"),
            scanned_at: at,
            ore: IntelQuote {
                mode,
                qty,
                base_qty: base,
                price,
            },
            organics: idle(),
            equipment: idle(),
        }
    }

    fn chain(n: SectorId) -> WarpGraph {
        let discovered: Vec<SectorId> = (1..=n).collect();
        let mut warps = Vec::new();
        for s in 1..n {
            warps.push((s, s + 1));
            warps.push((s + 1, s));
        }
        WarpGraph::from_discovered(&discovered, &warps)
    }

    #[test]
    fn bfs_distances_on_chain() {
        let g = chain(4);
        let d = g.distances_from(1);
        assert_eq!(d[&1], 0);
        assert_eq!(d[&4], 3);
    }

    #[test]
    fn undiscovered_sectors_break_paths() {
        let g = WarpGraph::from_discovered(&[1, 3], &[(1, 2), (2, 3)]);
        let d = g.distances_from(1);
        assert!(!d.contains_key(&3));
    }

    #[test]
    fn simple_chain_route() {
        let now = 100_000;
        let intel = vec![
            ore_intel(2, TradeMode::Sell, 100, 100, 5, now),
            ore_intel(4, TradeMode::Buy, 0, 100, 10, now),
        ];
        let r = best_route(now, 1, 10, &chain(4), &intel, None).unwrap();
        assert_eq!(r.buy_sector, 2);
        assert_eq!(r.sell_sector, 4);
        assert_eq!(r.trade_qty, 10);
        assert_eq!(r.profit_per_unit, 5);
        assert_eq!(r.total_turns, 5);
        assert_eq!(r.moves_to_buy, 1);
        assert_eq!(r.moves_buy_to_sell, 2);
    }

    #[test]
    fn stale_intel_loses_to_fresh() {
        let now = 1_000_000;
        let stale = now - 13 * 3_600;
        let fresh = now - 5 * 60;
        let intel = vec![
            ore_intel(2, TradeMode::Sell, 100, 100, 5, stale),
            ore_intel(4, TradeMode::Buy, 0, 100, 15, stale),
            ore_intel(3, TradeMode::Sell, 100, 100, 6, fresh),
            ore_intel(5, TradeMode::Buy, 0, 100, 13, fresh),
        ];
        let r = best_route(now, 1, 10, &chain(5), &intel, None).unwrap();
        assert_eq!((r.buy_sector, r.sell_sector), (3, 5));
    }

    #[test]
    fn freshness_buckets() {
        assert_eq!(freshness_weight(0), 1_000);
        assert_eq!(freshness_weight(15 * 60), 1_000);
        assert_eq!(freshness_weight(15 * 60 + 1), 900);
        assert_eq!(freshness_weight(3 * 3_600), 750);
        assert_eq!(freshness_weight(12 * 3_600), 600);
        assert_eq!(freshness_weight(12 * 3_600 + 1), 500);
        assert_eq!(freshness_weight(-50), 1_000);
    }

    #[test]
    fn saturated_buyer_is_ignored() {
        let now = 0;
        let intel = vec![
            ore_intel(2, TradeMode::Sell, 100, 100, 5, now),
            ore_intel(3, TradeMode::Buy, 100, 100, 50, now),
        ];
        assert!(best_route(now, 1, 10, &chain(3), &intel, None).is_none());
    }

    #[test]
    fn report_texts() {
        let g = chain(4);
        assert_eq!(
            route_report(0, 1, 10, &g, &[], None),
            "No route intel yet. Use SCAN in sectors with ports to record prices."
        );
        let intel = vec![ore_intel(2, TradeMode::Sell, 100, 100, 5, 0)];
        assert_eq!(
            route_report(0, 1, 10, &g, &intel, Some(Commodity::Ore)),
            "No profitable ORE route found with current scanned intel."
        );
        let intel = vec![
            ore_intel(2, TradeMode::Sell, 100, 100, 5, 0),
            ore_intel(4, TradeMode::Buy, 0, 100, 10, 0),
        ];
        let text = route_report(60, 1, 10, &g, &intel, None);
        assert!(text.starts_with(
            "Route suggestion (uses your scanned intel only):\nCommodity: ORE\n"
        ));
        assert!(text.contains("Step 1: Travel to Sector 2 (S2) in 1 move(s)."));
        assert!(text.contains("Spread: 5/unit | Qty assumed: 10 | Profit/trip: 50 credits"));
        assert!(
            text.ends_with("Moves: 3 | Est. turns (moves + 2 trades): 5 | Profit/turn: 10.00")
        );
    }
}
