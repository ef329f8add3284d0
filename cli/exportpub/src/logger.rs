//! Logging setup for the CLI.
//!
//! Pass diagnostics arrive as `tracing` events through
//! [`TracingSink`](exportpub_analysis::TracingSink), so the filter chosen here
//! decides which of them the user sees. Output goes to stderr, keeping stdout
//! free for reports.
//!
//! The level is picked in this order:
//! 1. `--verbose`: everything down to trace for exportpub crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `[log] level` from `exportpub.toml`
//! 5. info

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: &[&str] = &[
    "exportpub",
    "exportpub_analysis",
    "exportpub_glob",
    "exportpub_model",
];

/// Filter directive applying `level` to every exportpub crate.
pub fn directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the filter for the given flags and manifest level.
pub fn filter(verbose: bool, quiet: bool, manifest_level: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new(directives("trace"))
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directives(manifest_level.unwrap_or("info"))))
    }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, manifest_level: Option<&str>) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose, quiet, manifest_level))
        .with(fmt_layer)
        .init();
}
