//! Daemon logging setup.
//!
//! `RUST_LOG` wins when set; otherwise `info`, `debug` with `--verbose` or
//! `warn` with `--quiet`. Log lines go to stderr so stdout stays clean for
//! command output such as `status --json`.

use tracing_subscriber::EnvFilter;

pub fn default_level(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    // A second init (tests, repeated CLI entry) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
