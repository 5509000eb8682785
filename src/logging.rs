//! Logging setup using `tracing-subscriber`.
//!
//! Console-only output to stderr so the generated script on stdout stays
//! clean for piping. Controlled by `RUST_LOG` (default: `info`).

use tracing_subscriber::EnvFilter;

/// Initialise logging for the CLI.
///
/// Emits human-readable output to stderr only. Controlled by `RUST_LOG`
/// (default: `info`).
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
