use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::optimizer::combination::Combination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// True when `candidate` strictly beats `incumbent`.
    pub fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Minimize => candidate < incumbent,
            Self::Maximize => candidate > incumbent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Lightest feasible set.
    MinimizeCost,
    /// Highest total power.
    MaximizeScore,
    /// Highest power per unit of weight.
    MaximizeRatio,
}

impl Objective {
    pub fn direction(&self) -> Direction {
        match self {
            Self::MinimizeCost => Direction::Minimize,
            Self::MaximizeScore | Self::MaximizeRatio => Direction::Maximize,
        }
    }

    /// Objective value of a feasible combination. `None` means the
    /// combination is excluded: a zero total cost has no ratio.
    pub fn evaluate(&self, combination: &Combination<'_>) -> Option<f64> {
        match self {
            Self::MinimizeCost => Some(combination.total_cost),
            Self::MaximizeScore => Some(combination.total_score),
            Self::MaximizeRatio => {
                if combination.total_cost == 0.0 {
                    None
                } else {
                    Some(combination.total_score / combination.total_cost)
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinimizeCost => "minimize-cost",
            Self::MaximizeScore => "maximize-score",
            Self::MaximizeRatio => "maximize-ratio",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimize-cost" | "min-weight" | "weight" => Ok(Self::MinimizeCost),
            "maximize-score" | "max-power" | "power" => Ok(Self::MaximizeScore),
            "maximize-ratio" | "ratio" => Ok(Self::MaximizeRatio),
            _ => Err(ConfigError::UnknownObjective(s.to_string())),
        }
    }
}
