//! Normalize the raw armor table into the clean catalog the optimizer reads.
//! Reads data/import/armor.raw.csv, writes data/armor.clean.csv.
//! Raw columns used: name, type, weight, damage negation, resistance,
//! special effect, in-game section, dlc (header row required).

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use poisefit::data::normalize::{normalize_csv, ScoreWeights};
use poisefit::error::NormalizeError;
use poisefit::logging;

const DEFAULT_INPUT_SUFFIX: &str = "data/import/armor.raw.csv";
const DEFAULT_OUTPUT_SUFFIX: &str = "data/armor.clean.csv";

/// Resolve path relative to repo root (CARGO_MANIFEST_DIR when run via cargo).
fn repo_data_path(suffix: &str) -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        return PathBuf::from(manifest_dir).join(suffix);
    }
    PathBuf::from(suffix)
}

#[derive(Debug, Parser)]
#[command(name = "normalize_catalog")]
struct Args {
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    output: Option<PathBuf>,

    /// YAML map of stat -> power weight (e.g. `physical: 26`). Defaults to the boss-weighted set.
    #[arg(long)]
    weights: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> NormalizeError + '_ {
    move |source| NormalizeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn main() -> Result<(), NormalizeError> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let input_path = args
        .input
        .unwrap_or_else(|| repo_data_path(DEFAULT_INPUT_SUFFIX));
    let output_path = args
        .output
        .unwrap_or_else(|| repo_data_path(DEFAULT_OUTPUT_SUFFIX));

    let weights = match &args.weights {
        Some(path) => ScoreWeights::from_yaml(&fs::read_to_string(path).map_err(io_error(path))?)?,
        None => ScoreWeights::default(),
    };

    let input = File::open(&input_path).map_err(io_error(&input_path))?;
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let output = File::create(&output_path).map_err(io_error(&output_path))?;

    let summary = normalize_csv(input, output, &weights)?;
    info!(
        read = summary.read,
        unavailable = summary.unavailable,
        unknown_slot = summary.unknown_slot,
        "normalization finished"
    );
    println!(
        "Wrote {} items to {}",
        summary.written,
        output_path.display()
    );
    Ok(())
}
