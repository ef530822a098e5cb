use crate::config::load_config;
use crate::error::Result;
use crate::state::StateRoot;
use crate::ui;
use std::path::Path;
use tracing::info;

/// Forget the failed-version marker so the next check retries the build.
pub fn run(config_path: &Path, package: &str) -> Result<()> {
    let config = load_config(config_path)?;
    super::select_packages(&config, &[package.to_string()])?;

    let root = StateRoot::new(config.settings.state_dir.clone());

    let cleared = match root.existing(package)? {
        Some(state) => state.clear_failed()?,
        None => false,
    };

    if cleared {
        info!(package, "lastfailed marker cleared");
        ui::success(&format!("Cleared failed marker for '{}'", package));
    } else {
        ui::info(&format!("'{}' has no failed marker", package));
    }
    Ok(())
}
