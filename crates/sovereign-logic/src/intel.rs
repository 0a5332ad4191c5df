//! Per-player port intel captured by SCAN.
//!
//! Intel is a snapshot: it keeps the mode, stock and price a port showed at
//! scan time and is only refreshed by scanning that sector again.

use serde::{Deserialize, Serialize};

use crate::commodity::Commodity;
use crate::events::ActiveEvent;
use crate::model::{Port, SectorId, TradeMode};
use crate::pricing::stock_price;

/// What one commodity looked like at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelQuote {
    pub mode: TradeMode,
    pub qty: u32,
    pub base_qty: u32,
    pub price: i64,
}

impl IntelQuote {
    /// Units a BUY-mode port will still take before its demand saturates.
    pub fn demand(&self) -> u32 {
        self.base_qty.saturating_sub(self.qty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortIntel {
    pub sector_id: SectorId,
    pub sector_name: String,
    pub scanned_at: i64,
    pub ore: IntelQuote,
    pub organics: IntelQuote,
    pub equipment: IntelQuote,
}

impl PortIntel {
    /// Snapshot a live port, pricing it under the sector's active event.
    pub fn capture(
        port: &Port,
        sector_name: &str,
        event: Option<&ActiveEvent>,
        now: i64,
    ) -> Self {
        let quote = |c: Commodity| {
            let stock = port.stock(c);
            IntelQuote {
                mode: stock.mode,
                qty: stock.qty,
                base_qty: stock.base_qty,
                price: stock_price(stock, c, event),
            }
        };
        Self {
            sector_id: port.sector_id,
            sector_name: sector_name.to_string(),
            scanned_at: now,
            ore: quote(Commodity::Ore),
            organics: quote(Commodity::Organics),
            equipment: quote(Commodity::Equipment),
        }
    }

    pub fn quote(&self, commodity: Commodity) -> &IntelQuote {
        match commodity {
            Commodity::Ore => &self.ore,
            Commodity::Organics => &self.organics,
            Commodity::Equipment => &self.equipment,
        }
    }

    pub fn age(&self, now: i64) -> i64 {
        (now - self.scanned_at).max(0)
    }
}

/// Order an intel list newest scan first, as MARKET and ROUTE expect.
pub fn sort_newest_first(intel: &mut [PortIntel]) {
    intel.sort_by(|a, b| {
        b.scanned_at
            .cmp(&a.scanned_at)
            .then(a.sector_id.cmp(&b.sector_id))
    });
}
