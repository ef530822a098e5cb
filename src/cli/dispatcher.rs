//! Command dispatcher
//!
//! Routes CLI commands to their handlers.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::error::Result;
use crate::utils::paths;
use std::path::PathBuf;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    let config = config_path(args)?;

    match &args.command {
        Command::Run { allow_root } => commands::run::run(&config, *allow_root),
        Command::Check {
            packages,
            allow_root,
        } => commands::check::run(&config, packages, *allow_root),
        Command::Status { package, json } => {
            commands::status::run(&config, package.as_deref(), *json)
        }
        Command::ResetFailed { package } => commands::reset_failed::run(&config, package),
    }
}

fn config_path(args: &Cli) -> Result<PathBuf> {
    match &args.global.config {
        Some(path) => paths::expand_home(path),
        None => paths::config_file(),
    }
}
