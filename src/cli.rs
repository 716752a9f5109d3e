use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, error};

use crate::data::catalog::{load_catalog, DEFAULT_CATALOG_PATH};
use crate::data::item::{Attribute, Slot};
use crate::data::presets::{builtin_presets, find_preset, load_presets, Preset, DEFAULT_PRESETS_PATH};
use crate::data::validate::{validate_catalog, ValidationSeverity};
use crate::error::{ConfigError, PresetError};
use crate::logging;
use crate::optimizer::{search, Execution, SearchConfig, SearchMode};
use crate::parallel::WorkerPool;
use crate::report::ResultReport;

/// Exhaustive armor-set optimizer.
#[derive(Debug, Parser)]
#[command(name = "poisefit", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG overrides it.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find the best armor combination(s).
    Search(SearchArgs),
    /// List the named search modes and presets.
    Modes {
        #[arg(long)]
        presets: Option<PathBuf>,
    },
    /// Check a clean catalog for bad rows.
    Validate {
        #[arg(default_value = DEFAULT_CATALOG_PATH)]
        catalog: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search mode: lightest|1, lightest-base|1b, power|2, power-base|2b, ratio|3, ratio-base|3b.
    #[arg(long, default_value = "ratio", conflicts_with = "preset")]
    pub mode: String,

    /// Named preset from the presets file or the built-ins.
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long, default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    #[arg(long)]
    pub presets: Option<PathBuf>,

    /// Override the minimum total of the constrained attribute.
    #[arg(long)]
    pub min: Option<f64>,

    /// Constrained attribute (weight, poise, power).
    #[arg(long)]
    pub attribute: Option<String>,

    /// Upper bound on total weight.
    #[arg(long)]
    pub max_weight: Option<f64>,

    /// Drop individual pieces heavier than this.
    #[arg(long)]
    pub max_piece_weight: Option<f64>,

    /// Bind a slot to one item, e.g. `--fix "Helm=White Mask"`.
    #[arg(long = "fix", value_name = "SLOT=NAME")]
    pub fixed: Vec<String>,

    /// Base game items only.
    #[arg(long)]
    pub base_only: bool,

    /// Split the search across a rayon pool.
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads for --parallel (0 = all cores).
    #[arg(long, default_value_t = 0, requires = "parallel")]
    pub workers: usize,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    logging::init_tracing(Some(&cli.log_level));

    match cli.command {
        Command::Search(args) => handle_search(&args),
        Command::Modes { presets } => handle_modes(presets.as_deref()),
        Command::Validate { catalog } => handle_validate(&catalog),
    }
}

fn handle_search(args: &SearchArgs) -> i32 {
    let (label, config) = match build_config(args) {
        Ok(built) => built,
        Err(err) => {
            eprintln!("search failed: {err}");
            return 1;
        }
    };
    debug!(?config, "search configured");

    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("search failed: {err}");
            return 1;
        }
    };

    let started = Instant::now();
    let result = match search(&catalog, &config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("search failed: {err}");
            return 1;
        }
    };
    let report = ResultReport::new(label, &result, started.elapsed());

    if args.json {
        match report.to_json() {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                error!(%err, "failed to serialize search result");
                eprintln!("failed to serialize search result: {err}");
                return 1;
            }
        }
    } else {
        print!("{}", report.to_text());
    }
    0
}

#[derive(Debug, thiserror::Error)]
enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Presets(#[from] PresetError),
}

fn build_config(args: &SearchArgs) -> Result<(String, SearchConfig), BuildError> {
    let (label, mut config) = match &args.preset {
        Some(name) => {
            let presets = user_presets(args.presets.as_deref())?;
            let preset = find_preset(&presets, name)?;
            (preset.name, preset.config)
        }
        None => {
            let mode: SearchMode = args.mode.parse()?;
            (mode.name().to_string(), mode.config())
        }
    };

    if let Some(attribute) = &args.attribute {
        config.constraint.attribute = attribute.parse::<Attribute>()?;
    }
    if let Some(min) = args.min {
        config.constraint.minimum = min;
    }
    if let Some(max_weight) = args.max_weight {
        config.constraint.max_total_cost = Some(max_weight);
    }
    if args.max_piece_weight.is_some() {
        config.max_item_cost = args.max_piece_weight;
    }
    if args.base_only {
        config.base_content_only = true;
    }
    for raw in &args.fixed {
        let (slot, name) = parse_fixed(raw)?;
        config.fixed.insert(slot, name);
    }
    if args.parallel {
        config.execution = Execution::Parallel(WorkerPool::with_workers(args.workers));
    }
    config.validate()?;
    Ok((label, config))
}

/// `SLOT=NAME`; the name may itself contain `=`.
pub fn parse_fixed(raw: &str) -> Result<(Slot, String), ConfigError> {
    let Some((slot, name)) = raw.split_once('=') else {
        return Err(ConfigError::MalformedFixedItem(raw.to_string()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::MalformedFixedItem(raw.to_string()));
    }
    Ok((slot.parse()?, name.to_string()))
}

/// Presets from an explicit file, else the default file when present.
fn user_presets(path: Option<&Path>) -> Result<Vec<Preset>, PresetError> {
    match path {
        Some(path) => load_presets(path),
        None if Path::new(DEFAULT_PRESETS_PATH).exists() => load_presets(DEFAULT_PRESETS_PATH),
        None => Ok(Vec::new()),
    }
}

fn handle_modes(presets: Option<&Path>) -> i32 {
    println!("modes:");
    for mode in SearchMode::ALL {
        println!("  {:<14} ({:<2})  {}", mode.name(), mode.short(), mode.description());
    }

    let mut listed = match user_presets(presets) {
        Ok(presets) => presets,
        Err(err) => {
            eprintln!("failed to load presets: {err}");
            return 1;
        }
    };
    for builtin in builtin_presets() {
        if !listed.iter().any(|preset| preset.name == builtin.name) {
            listed.push(builtin);
        }
    }
    println!("presets:");
    for preset in listed {
        println!("  {:<14} {}", preset.name, preset.description);
    }
    0
}

fn handle_validate(path: &Path) -> i32 {
    let catalog = match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = validate_catalog(&catalog);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s) in {}",
            report.count(ValidationSeverity::Error),
            path.display()
        );
        1
    } else {
        println!("validation passed: {} ({} items)", path.display(), catalog.len());
        0
    }
}
