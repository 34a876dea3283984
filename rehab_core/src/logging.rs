//! Tracing setup shared by the rehab binaries.
//!
//! Log lines go to stderr so plan text and JSON on stdout stay parseable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used by the CLI when neither `RUST_LOG` nor `--verbose` is set
pub const QUIET_LEVEL: &str = "warn";

/// Level used by the CLI with `--verbose`
pub const VERBOSE_LEVEL: &str = "debug";

/// Install the global subscriber for a CLI run
///
/// `RUST_LOG` takes precedence over the `verbose` switch.
pub fn init_cli(verbose: bool) {
    init_with_level(if verbose { VERBOSE_LEVEL } else { QUIET_LEVEL })
}

/// Install the global subscriber with a default level
///
/// # Arguments
/// * `default_level` - Filter directive used when RUST_LOG is unset (e.g. "info")
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
