//! Named run modes: the standard searches selectable by a single name.

use std::fmt;
use std::str::FromStr;

use crate::data::item::Attribute;
use crate::error::ConfigError;
use crate::optimizer::objective::Objective;
use crate::optimizer::SearchConfig;

/// Poise needed to keep most attacks from staggering.
pub const DEFAULT_POISE_TARGET: f64 = 51.0;
/// Partial sets must still wear at least this many pieces.
pub const DEFAULT_MIN_PIECES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Lightest set of two or more pieces reaching the poise target.
    Lightest,
    LightestBase,
    /// Highest total power across all four slots.
    Power,
    PowerBase,
    /// Highest power per unit of weight across all four slots.
    Ratio,
    RatioBase,
}

impl SearchMode {
    pub const ALL: [SearchMode; 6] = [
        Self::Lightest,
        Self::LightestBase,
        Self::Power,
        Self::PowerBase,
        Self::Ratio,
        Self::RatioBase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Lightest => "lightest",
            Self::LightestBase => "lightest-base",
            Self::Power => "power",
            Self::PowerBase => "power-base",
            Self::Ratio => "ratio",
            Self::RatioBase => "ratio-base",
        }
    }

    /// Short selector kept for the numbered methods (`1`, `1b`, ...).
    pub fn short(&self) -> &'static str {
        match self {
            Self::Lightest => "1",
            Self::LightestBase => "1b",
            Self::Power => "2",
            Self::PowerBase => "2b",
            Self::Ratio => "3",
            Self::RatioBase => "3b",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Lightest | Self::LightestBase => {
                "lowest total weight, 2+ pieces, poise >= 51"
            }
            Self::Power | Self::PowerBase => "highest total power, all 4 pieces, poise >= 51",
            Self::Ratio | Self::RatioBase => "highest power/weight, all 4 pieces, poise >= 51",
        }
    }

    pub fn base_only(&self) -> bool {
        matches!(self, Self::LightestBase | Self::PowerBase | Self::RatioBase)
    }

    pub fn config(&self) -> SearchConfig {
        let config = match self {
            Self::Lightest | Self::LightestBase => {
                SearchConfig::full_set(Objective::MinimizeCost).with_skipping(DEFAULT_MIN_PIECES)
            }
            Self::Power | Self::PowerBase => SearchConfig::full_set(Objective::MaximizeScore),
            Self::Ratio | Self::RatioBase => SearchConfig::full_set(Objective::MaximizeRatio),
        }
        .with_min_threshold(Attribute::Threshold, DEFAULT_POISE_TARGET);

        if self.base_only() {
            config.base_content_only()
        } else {
            config
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted || mode.short() == wanted)
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}
