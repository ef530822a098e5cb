//! Scheduling loop
//!
//! One pass reloads the config if it changed, checks every package in order
//! and sleeps until the earliest package is due again. The sleep is a
//! [`Timer`] that reload and shutdown events cut short.

pub mod runtime;
pub mod timer;
pub mod watcher;

use crate::config::types::DEFAULT_CHECK_INTERVAL_SECS;
use crate::config::{ConfigReloader, PackageConfig, Settings};
use crate::engine::Engine;
use crate::error::Result;
use crate::state::StateRoot;
use crate::traits::Services;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub use runtime::Runtime;
pub use timer::{Timer, Wake, WakeEvent, channel};
pub use watcher::spawn_config_watcher;

/// Owns the collaborators and rebuilds them when settings change.
pub trait ServiceProvider {
    fn services(&self) -> Services<'_>;
    fn reconfigure(&mut self, settings: &Settings) -> Result<()>;
}

/// `max(1, min(deltas))`, or `fallback` when there is nothing to wait for.
pub fn sleep_duration(deltas: &[i64], fallback: i64) -> u64 {
    let min = deltas.iter().copied().min().unwrap_or(fallback);
    u64::try_from(min.max(1)).unwrap_or(1)
}

/// Delta for a package whose check errored. State that still says "due"
/// (lastchecked could not be written) waits a full interval instead of
/// failing again on the next one-second wake.
fn delta_after_failure(engine: &Engine<'_>, package: &PackageConfig) -> i64 {
    match engine.next_check_delta(package) {
        Ok(delta) if delta > 0 => delta,
        _ => package.interval_secs,
    }
}

pub struct Scheduler {
    reloader: ConfigReloader,
    root: StateRoot,
    timer: Timer,
}

impl Scheduler {
    /// The state root is fixed for the lifetime of the scheduler.
    pub fn new(reloader: ConfigReloader, timer: Timer) -> Self {
        let root = StateRoot::new(reloader.config().settings.state_dir.clone());
        Self {
            reloader,
            root,
            timer,
        }
    }

    pub fn root(&self) -> &StateRoot {
        &self.root
    }

    /// One iteration: reload, check every package, return seconds to sleep.
    pub fn run_once<P: ServiceProvider + ?Sized>(&mut self, provider: &mut P) -> u64 {
        self.reload(provider);

        let config = self.reloader.config();
        let engine = Engine::new(provider.services(), &config.settings, &self.root);

        let mut deltas = Vec::with_capacity(config.packages.len());
        for package in &config.packages {
            let delta = match engine.check(package) {
                Ok(outcome) => outcome.delta,
                Err(e) => {
                    error!(package = %package.name, "check failed: {}", e);
                    delta_after_failure(&engine, package)
                }
            };
            deltas.push(delta);
        }

        sleep_duration(&deltas, DEFAULT_CHECK_INTERVAL_SECS)
    }

    /// Loop until a shutdown event arrives.
    pub fn run<P: ServiceProvider + ?Sized>(&mut self, provider: &mut P) {
        info!(
            config = %self.reloader.path().display(),
            state_dir = %self.root.path().display(),
            packages = self.reloader.config().packages.len(),
            "scheduler started"
        );

        loop {
            let secs = self.run_once(provider);
            debug!(secs, "sleeping");
            match self.timer.wait(Duration::from_secs(secs)) {
                Wake::Elapsed => {}
                Wake::Reload => debug!("woken early by config change"),
                Wake::Shutdown => {
                    info!("shutdown requested, scheduler stopped");
                    return;
                }
            }
        }
    }

    fn reload<P: ServiceProvider + ?Sized>(&mut self, provider: &mut P) {
        match self.reloader.reload_if_changed() {
            Ok(false) => {}
            Ok(true) => {
                let settings = &self.reloader.config().settings;
                if settings.state_dir.as_path() != self.root.path() {
                    warn!(
                        configured = %settings.state_dir.display(),
                        active = %self.root.path().display(),
                        "state-dir change takes effect after a restart"
                    );
                }
                if let Err(e) = provider.reconfigure(settings) {
                    error!("could not apply new settings, keeping previous services: {}", e);
                }
                info!(
                    packages = self.reloader.config().packages.len(),
                    "configuration reloaded"
                );
            }
            Err(e) => {
                error!(
                    path = %self.reloader.path().display(),
                    "reload failed, keeping previous configuration: {}", e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, snapshot};
    use std::fs;
    use std::path::Path;
    use std::time::SystemTime;
    use tempfile::tempdir;

    const NOW: i64 = 1_700_000_000;

    struct FakeProvider {
        harness: Harness,
        reconfigured: usize,
    }

    impl ServiceProvider for FakeProvider {
        fn services(&self) -> Services<'_> {
            self.harness.services()
        }

        fn reconfigure(&mut self, _settings: &Settings) -> Result<()> {
            self.reconfigured += 1;
            Ok(())
        }
    }

    fn provider() -> FakeProvider {
        FakeProvider {
            harness: Harness::new(NOW, snapshot(1000, Some("alice"))),
            reconfigured: 0,
        }
    }

    fn write_config(path: &Path, state_dir: &Path, body: &str, mtime_offset: u64) {
        let content = format!(
            "settings {{\n    state-dir \"{}\"\n}}\n{}",
            state_dir.display(),
            body
        );
        fs::write(path, content).expect("write config");
        let file = fs::File::options().write(true).open(path).expect("open");
        file.set_modified(SystemTime::now() + Duration::from_secs(mtime_offset))
            .expect("set mtime");
    }

    fn scheduler(config: &Path) -> Scheduler {
        let (_tx, timer) = channel();
        Scheduler::new(ConfigReloader::open(config).expect("open config"), timer)
    }

    #[test]
    fn sleep_is_min_delta_clamped_to_one_second() {
        assert_eq!(sleep_duration(&[3600, 120, 86400], 86400), 120);
        assert_eq!(sleep_duration(&[3600, 0], 86400), 1);
        assert_eq!(sleep_duration(&[-50], 86400), 1);
        assert_eq!(sleep_duration(&[], 86400), 86400);
    }

    #[test]
    fn pass_sleeps_until_earliest_package() {
        let dir = tempdir().expect("tempdir");
        let config = dir.path().join("aurwatch.kdl");
        let state_dir = dir.path().join("state");
        write_config(
            &config,
            &state_dir,
            r#"
            package "yay" { maintainer "alice"; interval 3600 }
            package "paru" { maintainer "alice"; interval 7200 }
            "#,
            0,
        );

        let mut provider = provider();
        let mut scheduler = scheduler(&config);

        // Both due: both fetched and built, next pass in one hour.
        assert_eq!(scheduler.run_once(&mut provider), 3600);
        assert_eq!(provider.harness.metadata.calls.get(), 2);
        assert_eq!(provider.harness.runner.runs(), 2);

        provider.harness.clock.set(NOW + 1800);
        assert_eq!(scheduler.run_once(&mut provider), 1800);
        assert_eq!(provider.harness.metadata.calls.get(), 2);
    }

    #[test]
    fn failing_package_does_not_stop_the_pass() {
        let dir = tempdir().expect("tempdir");
        let config = dir.path().join("aurwatch.kdl");
        write_config(
            &config,
            &dir.path().join("state"),
            r#"
            package "yay" { interval 600 }
            package "paru" { interval 900 }
            "#,
            0,
        );

        let mut provider = provider();
        provider.harness.metadata = crate::test_support::FakeMetadata::failing("dns failure");
        let mut scheduler = scheduler(&config);

        assert_eq!(scheduler.run_once(&mut provider), 600);
        assert_eq!(provider.harness.metadata.calls.get(), 2);
    }

    #[test]
    fn unwritable_state_waits_a_full_interval() {
        let dir = tempdir().expect("tempdir");
        let config = dir.path().join("aurwatch.kdl");
        let state_dir = dir.path().join("state");
        write_config(&config, &state_dir, r#"package "yay" { interval 900 }"#, 0);

        // A directory where the temp file goes makes every lastchecked write fail.
        fs::create_dir_all(state_dir.join("yay").join(".lastchecked.tmp")).expect("block write");

        let mut provider = provider();
        let mut scheduler = scheduler(&config);
        assert_eq!(scheduler.run_once(&mut provider), 900);
        assert_eq!(provider.harness.metadata.calls.get(), 0);
    }

    #[test]
    fn changed_config_is_picked_up_and_state_dir_is_kept() {
        let dir = tempdir().expect("tempdir");
        let config = dir.path().join("aurwatch.kdl");
        let state_dir = dir.path().join("state");
        write_config(&config, &state_dir, r#"package "yay" { interval 3600 }"#, 0);

        let mut provider = provider();
        let mut scheduler = scheduler(&config);
        scheduler.run_once(&mut provider);

        write_config(
            &config,
            &dir.path().join("elsewhere"),
            r#"
            package "yay" { interval 3600 }
            package "paru" { interval 60 }
            "#,
            60,
        );
        assert_eq!(scheduler.run_once(&mut provider), 60);
        assert_eq!(provider.reconfigured, 1);
        assert_eq!(scheduler.root().path(), state_dir.as_path());
        assert!(state_dir.join("paru").is_dir());
        assert!(!dir.path().join("elsewhere").exists());
    }

    #[test]
    fn broken_config_keeps_previous_packages() {
        let dir = tempdir().expect("tempdir");
        let config = dir.path().join("aurwatch.kdl");
        let state_dir = dir.path().join("state");
        write_config(&config, &state_dir, r#"package "yay" { interval 3600 }"#, 0);

        let mut provider = provider();
        let mut scheduler = scheduler(&config);
        scheduler.run_once(&mut provider);

        fs::write(&config, "package \"yay\" {").expect("break config");
        let file = fs::File::options().write(true).open(&config).expect("open");
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .expect("set mtime");

        provider.harness.clock.set(NOW + 100);
        assert_eq!(scheduler.run_once(&mut provider), 3500);
        assert_eq!(provider.reconfigured, 0);
    }

    #[test]
    fn shutdown_ends_the_loop() {
        let dir = tempdir().expect("tempdir");
        let config = dir.path().join("aurwatch.kdl");
        write_config(&config, &dir.path().join("state"), "", 0);

        let (tx, timer) = channel();
        let mut scheduler = Scheduler::new(ConfigReloader::open(&config).expect("open"), timer);
        tx.send(WakeEvent::Shutdown).expect("send");

        let mut provider = provider();
        scheduler.run(&mut provider);
        assert_eq!(provider.harness.metadata.calls.get(), 0);
    }
}
