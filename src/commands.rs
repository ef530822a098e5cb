//! Subcommand handlers

pub mod check;
pub mod reset_failed;
pub mod run;
pub mod status;

use crate::config::Config;
use crate::error::{AurwatchError, Result};
use crate::utils::platform;

/// Building untrusted PKGBUILDs as root is refused unless explicitly allowed.
pub(crate) fn ensure_not_root(allow_root: bool) -> Result<()> {
    if platform::running_as_root() && !allow_root {
        return Err(AurwatchError::RunningAsRoot);
    }
    Ok(())
}

/// Resolve package names from the command line against the config.
/// An empty selection means every configured package.
pub(crate) fn select_packages<'a>(
    config: &'a Config,
    names: &[String],
) -> Result<Vec<&'a crate::config::PackageConfig>> {
    if names.is_empty() {
        return Ok(config.packages.iter().collect());
    }
    names
        .iter()
        .map(|name| {
            config.package(name).ok_or_else(|| {
                AurwatchError::ConfigError(format!("Package '{}' is not configured", name))
            })
        })
        .collect()
}
