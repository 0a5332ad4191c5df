//! The three tradeable commodities and per-commodity quantity triples.

use serde::{Deserialize, Serialize};

/// A tradeable good. Every port, cargo hold and planet store tracks all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Commodity {
    Ore,
    Organics,
    Equipment,
}

impl Commodity {
    pub const ALL: [Commodity; 3] = [Commodity::Ore, Commodity::Organics, Commodity::Equipment];

    /// Parse an already-normalized (trimmed, uppercase) commodity code.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ORE" => Some(Commodity::Ore),
            "ORGANICS" => Some(Commodity::Organics),
            "EQUIPMENT" => Some(Commodity::Equipment),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Commodity::Ore => "ORE",
            Commodity::Organics => "ORGANICS",
            Commodity::Equipment => "EQUIPMENT",
        }
    }

    /// Lowercase name used in player-facing sentences.
    pub fn noun(self) -> &'static str {
        match self {
            Commodity::Ore => "ore",
            Commodity::Organics => "organics",
            Commodity::Equipment => "equipment",
        }
    }

    /// Short label for compact listings ("Org").
    pub fn short(self) -> &'static str {
        match self {
            Commodity::Ore => "Ore",
            Commodity::Organics => "Org",
            Commodity::Equipment => "Eq",
        }
    }

    /// "much" or "many", for "You do not have that much ore."
    pub fn quantifier(self) -> &'static str {
        match self {
            Commodity::Organics => "many",
            Commodity::Ore | Commodity::Equipment => "much",
        }
    }
}

impl std::fmt::Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-negative quantity per commodity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holds {
    pub ore: u32,
    pub organics: u32,
    pub equipment: u32,
}

impl Holds {
    pub const fn new(ore: u32, organics: u32, equipment: u32) -> Self {
        Self {
            ore,
            organics,
            equipment,
        }
    }

    pub fn get(&self, commodity: Commodity) -> u32 {
        match commodity {
            Commodity::Ore => self.ore,
            Commodity::Organics => self.organics,
            Commodity::Equipment => self.equipment,
        }
    }

    pub fn get_mut(&mut self, commodity: Commodity) -> &mut u32 {
        match commodity {
            Commodity::Ore => &mut self.ore,
            Commodity::Organics => &mut self.organics,
            Commodity::Equipment => &mut self.equipment,
        }
    }

    pub fn total(&self) -> u32 {
        self.ore.saturating_add(self.organics).saturating_add(self.equipment)
    }
}
