//! Tracing subscriber setup

use crate::cli::Cli;
use tracing_subscriber::EnvFilter;

/// The filter directive implied by the verbosity flags, if any was given
pub fn level_for(cli: &Cli) -> Option<&'static str> {
    if cli.debug {
        Some("debug")
    } else if cli.verbose {
        Some("info")
    } else if cli.quiet {
        Some("error")
    } else {
        None
    }
}

/// Log to stderr. Explicit flags win over `RUST_LOG`, which wins over `warn`.
pub fn configure_logging(cli: &Cli) {
    let filter = match level_for(cli) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}
