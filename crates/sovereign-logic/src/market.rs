//! MARKET advisory: best known buy and sell quotes per commodity.

use crate::commodity::Commodity;
use crate::format::format_age_short;
use crate::intel::PortIntel;
use crate::model::{SectorId, TradeMode};

/// One side of a commodity's best known market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuote {
    pub sector_id: SectorId,
    pub sector_name: String,
    pub price: i64,
    pub qty: u32,
    pub base_qty: u32,
    pub scanned_at: i64,
}

/// Cheapest port selling `commodity` and priciest port buying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommodityMarket {
    pub commodity: Commodity,
    pub cheapest_seller: Option<MarketQuote>,
    pub best_buyer: Option<MarketQuote>,
}

impl CommodityMarket {
    pub fn spread(&self) -> Option<i64> {
        match (&self.cheapest_seller, &self.best_buyer) {
            (Some(s), Some(b)) => Some(b.price - s.price),
            _ => None,
        }
    }
}

fn to_quote(pi: &PortIntel, commodity: Commodity) -> MarketQuote {
    let q = pi.quote(commodity);
    MarketQuote {
        sector_id: pi.sector_id,
        sector_name: pi.sector_name.clone(),
        price: q.price,
        qty: q.qty,
        base_qty: q.base_qty,
        scanned_at: pi.scanned_at,
    }
}

/// Scan the intel list in order; ties keep the first quote seen.
pub fn summarize(intel: &[PortIntel], commodity: Commodity) -> CommodityMarket {
    let mut cheapest_seller: Option<MarketQuote> = None;
    let mut best_buyer: Option<MarketQuote> = None;
    for pi in intel {
        let q = pi.quote(commodity);
        match q.mode {
            TradeMode::Sell => {
                let better = cheapest_seller.as_ref().map_or(true, |cur| q.price < cur.price);
                if q.price > 0 && better {
                    cheapest_seller = Some(to_quote(pi, commodity));
                }
            }
            TradeMode::Buy => {
                let better = best_buyer.as_ref().map_or(true, |cur| q.price > cur.price);
                if better {
                    best_buyer = Some(to_quote(pi, commodity));
                }
            }
        }
    }
    CommodityMarket {
        commodity,
        cheapest_seller,
        best_buyer,
    }
}

fn describe(side: &str, q: &MarketQuote, now: i64) -> String {
    format!(
        "{side} @ Sector {} ({}) {} cr (qty {}/{}, age {})",
        q.sector_id,
        q.sector_name,
        q.price,
        q.qty,
        q.base_qty,
        format_age_short(now, Some(q.scanned_at))
    )
}

/// Player-facing text for a MARKET command.
pub fn market_report(now: i64, intel: &[PortIntel], filter: Option<Commodity>) -> String {
    if intel.is_empty() {
        return "No market intel yet. Use SCAN in sectors with ports to record prices.".to_string();
    }
    let mut lines = vec![
        format!("Market intel: {} scanned ports.", intel.len()),
        "Note: MARKET uses your scanned intel (SCAN) only; remote prices may be stale.".to_string(),
    ];
    let commodities = filter.map_or(Commodity::ALL.to_vec(), |c| vec![c]);
    for commodity in commodities {
        let m = summarize(intel, commodity);
        match (&m.cheapest_seller, &m.best_buyer, m.spread()) {
            (Some(s), Some(b), Some(spread)) => lines.push(format!(
                "{commodity}: {} | {} | spread {spread}/unit",
                describe("BUY", s, now),
                describe("SELL", b, now)
            )),
            _ => lines.push(format!(
                "{commodity}: insufficient intel (need at least one SELL and one BUY port scanned)."
            )),
        }
    }
    lines.join("\n")
}
