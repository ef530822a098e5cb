use crate::config::ConfigReloader;
use crate::error::{AurwatchError, Result};
use crate::scheduler::{self, Runtime, Scheduler, WakeEvent, watcher};
use crate::state::acquire_root_lock;
use crate::ui;
use std::path::Path;
use tracing::info;

/// Run the daemon until SIGINT or SIGTERM.
pub fn run(config_path: &Path, allow_root: bool) -> Result<()> {
    super::ensure_not_root(allow_root)?;

    let reloader = ConfigReloader::open(config_path)?;
    let settings = reloader.config().settings.clone();
    let _lock = acquire_root_lock(&settings.state_dir)?;
    let mut runtime = Runtime::new(&settings)?;

    let (tx, timer) = scheduler::channel();
    let shutdown = tx.clone();
    ctrlc::set_handler(move || {
        ui::mark_interrupted();
        let _ = shutdown.send(WakeEvent::Shutdown);
    })
    .map_err(|e| AurwatchError::Other(format!("Cannot install signal handler: {}", e)))?;

    watcher::spawn_config_watcher(config_path.to_path_buf(), tx, watcher::DEFAULT_POLL)?;

    if ui::is_interrupted() {
        return Err(AurwatchError::Interrupted);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        fetch_errors = ?settings.fetch_errors,
        failure_policy = ?settings.failure_policy,
        "starting"
    );
    Scheduler::new(reloader, timer).run(&mut runtime);
    Ok(())
}
