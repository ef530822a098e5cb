//! Build orchestration
//!
//! Sequencing and state transitions around one build attempt. The actual
//! work happens in external commands behind [`CommandRunner`].

pub mod command_exec;
pub mod log;
pub mod strategy;

use crate::config::{FailurePolicy, PackageConfig, Settings};
use crate::error::Result;
use crate::notify::{build_report_message, send_best_effort};
use crate::remote::Snapshot;
use crate::state::PackageState;
use crate::traits::{CommandRunner, CommandSpec, Services};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub use command_exec::ProcessRunner;
pub use log::BuildLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    pub log_path: PathBuf,
    pub duration: Duration,
}

/// Build `snapshot`, record the outcome and report it.
///
/// Only state/log IO errors propagate; anything the build itself does wrong
/// ends up as [`BuildOutcome::Failure`].
pub fn run_build(
    services: &Services<'_>,
    settings: &Settings,
    package: &PackageConfig,
    state: &PackageState,
    snapshot: &Snapshot,
) -> Result<BuildReport> {
    let started = services.clock.now();
    state.set_last_build_started(started)?;
    let log = BuildLog::create(&state.log_dir(), started)?;
    let timer = Instant::now();

    info!(
        package = %package.name,
        version = %snapshot.version,
        strategy = package.strategy.name(),
        log = %log.path().display(),
        "build started"
    );

    let success = build_steps(services, settings, package, state, snapshot, &log)?;
    let outcome = if success {
        BuildOutcome::Success
    } else {
        BuildOutcome::Failure
    };

    record_outcome(settings.failure_policy, state, snapshot, outcome)?;

    let report = BuildReport {
        outcome,
        log_path: log.path().to_path_buf(),
        duration: timer.elapsed(),
    };

    match outcome {
        BuildOutcome::Success => info!(
            package = %package.name,
            duration_secs = report.duration.as_secs(),
            "build succeeded"
        ),
        BuildOutcome::Failure => error!(
            package = %package.name,
            duration_secs = report.duration.as_secs(),
            log = %report.log_path.display(),
            "build failed"
        ),
    }

    if let Some(to) = package.notify_target(settings) {
        let message = build_report_message(&package.name, snapshot, &report, to);
        send_best_effort(services.notifier, &message);
    }

    Ok(report)
}

fn build_steps(
    services: &Services<'_>,
    settings: &Settings,
    package: &PackageConfig,
    state: &PackageState,
    snapshot: &Snapshot,
    log: &BuildLog,
) -> Result<bool> {
    let src_dir = match services.sources.fetch_sources(snapshot, &state.work_dir()) {
        Ok(dir) => dir,
        Err(e) => {
            warn!(package = %package.name, "source retrieval failed: {}", e);
            log.note(&format!("source retrieval failed: {}", e))?;
            return Ok(false);
        }
    };

    let build = match strategy::build_command(&package.strategy, &package.build, &src_dir, settings)
    {
        Ok(spec) => spec,
        Err(e) => {
            log.note(&format!("cannot prepare build command: {}", e))?;
            return Ok(false);
        }
    };
    if !run_logged(services.runner, &build, log)? {
        return Ok(false);
    }

    if let Some(commit) = &package.commit {
        let publish = strategy::host_command(commit, &src_dir);
        if !run_logged(services.runner, &publish, log)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Run one command with a header and footer in the log. Spawn errors count
/// as a failed command.
fn run_logged(runner: &dyn CommandRunner, spec: &CommandSpec, log: &BuildLog) -> Result<bool> {
    log.command_started(&spec.to_string())?;
    let timer = Instant::now();

    let success = match runner.run(spec, log.path()) {
        Ok(success) => success,
        Err(e) => {
            log.note(&format!("could not run command: {}", e))?;
            false
        }
    };

    log.command_finished(success, timer.elapsed())?;
    Ok(success)
}

/// Move the watermark that corresponds to `outcome` under `policy`.
pub fn record_outcome(
    policy: FailurePolicy,
    state: &PackageState,
    snapshot: &Snapshot,
    outcome: BuildOutcome,
) -> Result<()> {
    match (outcome, policy) {
        (BuildOutcome::Success, _) | (BuildOutcome::Failure, FailurePolicy::Legacy) => {
            state.set_last_success(snapshot.last_modified)
        }
        (BuildOutcome::Failure, FailurePolicy::TrackFailures) => {
            state.set_last_failed(snapshot.last_modified)
        }
    }
}
