//! Tracing setup for the binaries. Logs go to stderr so stdout stays
//! parseable (JSON reports, CSV output).

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `log_level` when set.
/// Calling this twice is harmless; the second install is ignored.
pub fn init_tracing(log_level: Option<&str>) {
    let base_level = log_level.unwrap_or("warn");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("poisefit={base_level},normalize_catalog={base_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}
