use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Equipment slot. A combination holds at most one item per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    Helm,
    Chest,
    Gauntlets,
    Legs,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Helm, Slot::Chest, Slot::Gauntlets, Slot::Legs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Helm => "Helm",
            Self::Chest => "Chest",
            Self::Gauntlets => "Gauntlets",
            Self::Legs => "Legs",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both the clean catalog names and the raw source vocabulary
/// (`chest armor`, `leg armor`).
impl FromStr for Slot {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "helm" | "head" => Ok(Self::Helm),
            "chest" | "chest armor" | "body" => Ok(Self::Chest),
            "gauntlets" | "arms" => Ok(Self::Gauntlets),
            "legs" | "leg armor" => Ok(Self::Legs),
            _ => Err(ConfigError::UnknownSlot(s.to_string())),
        }
    }
}

/// Base game vs. expansion content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[default]
    Base,
    Expansion,
}

impl Origin {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Self::Expansion
        } else {
            Self::Base
        }
    }

    pub fn is_expansion(&self) -> bool {
        matches!(self, Self::Expansion)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub slot: Slot,
    /// Weight.
    pub cost: f64,
    /// Poise.
    pub threshold: f64,
    /// Weighted composite of the normalized negation/resistance stats.
    pub score: f64,
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, slot: Slot, cost: f64, threshold: f64, score: f64) -> Self {
        Self {
            name: name.into(),
            slot,
            cost,
            threshold,
            score,
            origin: Origin::Base,
            special: None,
        }
    }

    pub fn with_origin(self, origin: Origin) -> Self {
        Self { origin, ..self }
    }

    pub fn attribute(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Cost => self.cost,
            Attribute::Threshold => self.threshold,
            Attribute::Score => self.score,
        }
    }
}

/// Numeric item attributes a constraint can be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Cost,
    Threshold,
    Score,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cost => "weight",
            Self::Threshold => "poise",
            Self::Score => "power",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" | "cost" => Ok(Self::Cost),
            "poise" | "threshold" => Ok(Self::Threshold),
            "power" | "score" => Ok(Self::Score),
            _ => Err(ConfigError::UnknownAttribute(s.to_string())),
        }
    }
}

/// Round to two decimals, the precision the catalog is prepared at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_parses_raw_and_clean_names() {
        assert_eq!("chest armor".parse::<Slot>().unwrap(), Slot::Chest);
        assert_eq!("Legs".parse::<Slot>().unwrap(), Slot::Legs);
        assert_eq!(" helm ".parse::<Slot>().unwrap(), Slot::Helm);
        assert!(matches!(
            "cape".parse::<Slot>(),
            Err(ConfigError::UnknownSlot(name)) if name == "cape"
        ));
    }

    #[test]
    fn attribute_aliases_resolve() {
        assert_eq!("Poise".parse::<Attribute>().unwrap(), Attribute::Threshold);
        assert_eq!("weight".parse::<Attribute>().unwrap(), Attribute::Cost);
        assert!("agility".parse::<Attribute>().is_err());
    }

    #[test]
    fn round2_removes_accumulation_noise() {
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(25.1 + 25.9), 51.0);
        assert_eq!(round2(8.6666), 8.67);
    }
}
