//! Diagnostic logging setup.
//!
//! Logs go to stderr so command output on stdout stays pipeable.
//! `PASSVAULT_LOG` takes an `EnvFilter` directive and overrides `--verbose`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PASSVAULT_LOG";

/// Build the filter from `PASSVAULT_LOG`, or from the verbosity flag.
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!("passvault={level},warn"))
    })
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
