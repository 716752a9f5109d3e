//! Error types for catalog loading, configuration and search.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::item::Slot;

/// Invalid run configuration. Always raised before enumeration starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown slot '{0}'")]
    UnknownSlot(String),

    #[error("unknown attribute '{0}' (expected weight, poise or power)")]
    UnknownAttribute(String),

    #[error("fixed item '{name}' not found in {slot} candidates")]
    FixedItemNotFound { slot: Slot, name: String },

    #[error("fixed item given for {0}, which is not a searched slot")]
    FixedSlotNotSearched(Slot),

    #[error("slot list is empty")]
    EmptySlotList,

    #[error("slot {0} listed more than once")]
    DuplicateSlot(Slot),

    #[error("minimum occupied slots {min} is outside 1..={slots}")]
    MinOccupiedOutOfRange { min: usize, slots: usize },

    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidBound { field: &'static str, value: f64 },

    #[error("unknown objective '{0}' (expected minimize-cost, maximize-score or maximize-ratio)")]
    UnknownObjective(String),

    #[error("unknown search mode '{0}'")]
    UnknownMode(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("malformed fixed item '{0}' (expected SLOT=NAME)")]
    MalformedFixedItem(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("failed to read presets '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse presets YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("preset '{name}': {source}")]
    Config {
        name: String,
        #[source]
        source: ConfigError,
    },
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("failed to parse weights YAML: {0}")]
    Weights(#[from] serde_yaml::Error),
}

pub type SearchResult<T> = Result<T, SearchError>;
