use crate::build::BuildOutcome;
use crate::config::load_config;
use crate::engine::{CheckOutcome, Engine, UpdateOutcome};
use crate::error::Result;
use crate::scheduler::{Runtime, ServiceProvider};
use crate::state::{StateRoot, acquire_root_lock};
use crate::ui;
use std::path::Path;

/// One pass over the selected packages, as the daemon would do it.
pub fn run(config_path: &Path, packages: &[String], allow_root: bool) -> Result<()> {
    super::ensure_not_root(allow_root)?;

    let config = load_config(config_path)?;
    let selected = super::select_packages(&config, packages)?;
    let _lock = acquire_root_lock(&config.settings.state_dir)?;

    let runtime = Runtime::new(&config.settings)?;
    let root = StateRoot::new(config.settings.state_dir.clone());
    let engine = Engine::new(runtime.services(), &config.settings, &root);

    let mut last_error = None;
    for package in selected {
        match engine.check(package) {
            Ok(outcome) => print_outcome(&package.name, &outcome),
            Err(e) => {
                ui::error(&format!("{}: {}", package.name, e));
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn print_outcome(name: &str, outcome: &CheckOutcome) {
    let detail = match &outcome.update {
        None => String::new(),
        Some(UpdateOutcome::MaintainerMismatch) => ", blocked by maintainer mismatch".to_string(),
        Some(UpdateOutcome::Built(report)) => match report.outcome {
            BuildOutcome::Success => format!(", built in {}s", report.duration.as_secs()),
            BuildOutcome::Failure => format!(", build failed (log: {})", report.log_path.display()),
        },
    };
    let line = format!(
        "{}: {}{}, next check in {}s",
        name, outcome.decision, detail, outcome.delta
    );

    match &outcome.update {
        Some(UpdateOutcome::Built(report)) if report.outcome == BuildOutcome::Failure => {
            ui::warning(&line)
        }
        Some(UpdateOutcome::MaintainerMismatch) => ui::warning(&line),
        _ => ui::success(&line),
    }
}
