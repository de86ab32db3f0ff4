//! Diagnostic logging to stderr.
//!
//! Stdout carries the rendered envelope only, so every tracing event goes to
//! stderr. `ETFPULSE_LOG` takes an `EnvFilter` directive; `--verbose` forces
//! debug output for the etfpulse crates.

use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "ETFPULSE_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";
const VERBOSE_DIRECTIVE: &str = "warn,etfpulse_core=debug,etfpulse=debug";

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_DIRECTIVE)
    } else {
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
    };

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
