pub mod build;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod notify;
pub mod project_identity;
pub mod remote;
pub mod scheduler;
pub mod state;
pub mod traits;
pub mod ui;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

use clap::Parser;
use std::process::exit;

/// Run aurwatch CLI entrypoint.
pub fn run_cli() {
    // 0. Initialize color settings (must be first)
    ui::init_colors();

    // 1. Parse, then configure output before anything can log
    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);
    logging::init(args.global.verbose, args.global.quiet);

    // 2. Run
    if let Err(e) = cli::dispatcher::dispatch(&args) {
        if ui::is_verbose() {
            for line in error_report(&e) {
                ui::error(&line);
            }
        } else if e.is_expected() {
            ui::error(&e.to_string());
        } else {
            ui::error(&format!(
                "Unexpected error: {} (re-run with --verbose for details)",
                summarize(&e.to_string())
            ));
        }
        exit(e.exit_code());
    }
}

/// The error followed by its causes. A cause whose text the previous line
/// already shows is skipped.
fn error_report(e: &dyn std::error::Error) -> Vec<String> {
    let mut shown = e.to_string();
    let mut lines = vec![shown.clone()];
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !shown.contains(&text) {
            lines.push(format!("  caused by: {}", text));
        }
        shown = text;
        source = cause.source();
    }
    lines
}

/// First line of an error message, which is all a non-verbose run shows.
fn summarize(message: &str) -> &str {
    message.lines().next().unwrap_or(message)
}
