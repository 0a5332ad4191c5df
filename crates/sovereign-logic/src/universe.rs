//! Pre-built universe documents: sectors, warps and ports.
//!
//! The server's `import_universe` reducer and the simulation harness both load
//! this JSON shape. Generating a universe is out of scope; this only checks
//! that a document is self-consistent.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commodity::Commodity;
use crate::model::{Port, Sector, SectorId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpLink {
    pub from: SectorId,
    pub to: SectorId,
    /// Two-way unless set.
    #[serde(default)]
    pub one_way: bool,
}

impl WarpLink {
    /// Directed edges this link produces.
    pub fn edges(&self) -> Vec<(SectorId, SectorId)> {
        if self.one_way {
            vec![(self.from, self.to)]
        } else {
            vec![(self.from, self.to), (self.to, self.from)]
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Universe {
    pub sectors: Vec<Sector>,
    pub warps: Vec<WarpLink>,
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniverseError {
    #[error("invalid universe JSON: {0}")]
    Json(String),
    #[error("sector {0} is defined twice")]
    DuplicateSector(SectorId),
    #[error("warp {from} -> {to} references an unknown sector")]
    DanglingWarp { from: SectorId, to: SectorId },
    #[error("warp from sector {0} to itself")]
    SelfWarp(SectorId),
    #[error("port references unknown sector {0}")]
    DanglingPort(SectorId),
    #[error("port in sector {sector} stocks more {commodity} than its base quantity")]
    OverstockedPort { sector: SectorId, commodity: Commodity },
}

impl Universe {
    /// Parse and validate a document.
    pub fn from_json(json: &str) -> Result<Self, UniverseError> {
        let universe: Universe =
            serde_json::from_str(json).map_err(|e| UniverseError::Json(e.to_string()))?;
        universe.validate()?;
        Ok(universe)
    }

    pub fn validate(&self) -> Result<(), UniverseError> {
        let mut ids = BTreeSet::new();
        for s in &self.sectors {
            if !ids.insert(s.id) {
                return Err(UniverseError::DuplicateSector(s.id));
            }
        }
        for w in &self.warps {
            if w.from == w.to {
                return Err(UniverseError::SelfWarp(w.from));
            }
            if !ids.contains(&w.from) || !ids.contains(&w.to) {
                return Err(UniverseError::DanglingWarp {
                    from: w.from,
                    to: w.to,
                });
            }
        }
        for p in &self.ports {
            if !ids.contains(&p.sector_id) {
                return Err(UniverseError::DanglingPort(p.sector_id));
            }
            for c in Commodity::ALL {
                let stock = p.stock(c);
                if stock.qty > stock.base_qty {
                    return Err(UniverseError::OverstockedPort {
                        sector: p.sector_id,
                        commodity: c,
                    });
                }
            }
        }
        Ok(())
    }

    /// Every directed edge, deduplicated and sorted.
    pub fn edges(&self) -> Vec<(SectorId, SectorId)> {
        let set: BTreeSet<(SectorId, SectorId)> =
            self.warps.iter().flat_map(WarpLink::edges).collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_port;

    fn sector(id: SectorId) -> Sector {
        Sector {
            id,
            name: format!("S{id}"),
            is_protectorate: false,
            protectorate_fighters: 0,
        }
    }

    #[test]
    fn two_way_links_expand() {
        let u = Universe {
            sectors: vec![sector(1), sector(2), sector(3)],
            warps: vec![
                WarpLink { from: 1, to: 2, one_way: false },
                WarpLink { from: 2, to: 3, one_way: true },
                WarpLink { from: 2, to: 1, one_way: false },
            ],
            ports: vec![],
        };
        assert!(u.validate().is_ok());
        assert_eq!(u.edges(), vec![(1, 2), (2, 1), (2, 3)]);
    }

    #[test]
    fn rejects_dangling_references() {
        let mut u = Universe {
            sectors: vec![sector(1)],
            warps: vec![WarpLink { from: 1, to: 9, one_way: false }],
            ports: vec![],
        };
        assert_eq!(
            u.validate(),
            Err(UniverseError::DanglingWarp { from: 1, to: 9 })
        );
        u.warps.clear();
        u.ports.push(sample_port(4));
        assert_eq!(u.validate(), Err(UniverseError::DanglingPort(4)));
    }

    #[test]
    fn rejects_duplicates_and_loops() {
        let u = Universe {
            sectors: vec![sector(1), sector(1)],
            ..Universe::default()
        };
        assert_eq!(u.validate(), Err(UniverseError::DuplicateSector(1)));

        let u = Universe {
            sectors: vec![sector(1)],
            warps: vec![WarpLink { from: 1, to: 1, one_way: true }],
            ports: vec![],
        };
        assert_eq!(u.validate(), Err(UniverseError::SelfWarp(1)));
    }

    #[test]
    fn rejects_overstocked_port() {
        let mut port = sample_port(1);
        port.organics.qty = port.organics.base_qty + 1;
        let u = Universe {
            sectors: vec![sector(1)],
            warps: vec![],
            ports: vec![port],
        };
        assert_eq!(
            u.validate(),
            Err(UniverseError::OverstockedPort {
                sector: 1,
                commodity: Commodity::Organics
            })
        );
    }

    #[test]
    fn partial_json_parses() {
        let json = r#"{"sectors":[
            {"id":1,"name":"Sol","is_protectorate":true,"protectorate_fighters":50}
        ]}"#;
        let u = Universe::from_json(json).unwrap();
        assert_eq!(u.sectors.len(), 1);
        assert!(u.warps.is_empty());
        assert!(matches!(
            Universe::from_json("{"),
            Err(UniverseError::Json(_))
        ));
    }
}
