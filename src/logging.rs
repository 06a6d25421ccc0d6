//! Logging initialization.
//!
//! Diagnostics go to stderr so stdout stays reserved for command output.

use std::io::{self, IsTerminal};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `debug`
pub const LOG_ENV: &str = "SEMVER_GIT_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Pick the filter directive: `--verbose` wins, then [LOG_ENV], then `warn`.
fn directive(verbose: bool, env_value: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    env_value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(verbose: bool) {
    let directive = directive(verbose, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let layer = fmt::layer()
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
