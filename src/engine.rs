//! Update decision engine
//!
//! One `check` per package per scheduler pass. The fast path is pure
//! arithmetic on `lastchecked`; only a due package touches the network,
//! and only a rebuild decision reaches the maintainer guard and the build.

pub mod decision;
pub mod maintainer;

use crate::build::{self, BuildReport};
use crate::config::{FetchErrorPolicy, PackageConfig, Settings};
use crate::error::Result;
use crate::remote::Snapshot;
use crate::state::{PackageState, StateRoot};
use crate::traits::Services;
use tracing::{debug, info, warn};

pub use decision::{Decision, decide, parse_force_interval, time_until_next_check};
pub use maintainer::{MaintainerVerdict, canonical_maintainer};

/// What an update call did once a rebuild was decided.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Built(BuildReport),
    MaintainerMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub decision: Decision,
    /// Seconds until this package should be checked again
    pub delta: i64,
    pub update: Option<UpdateOutcome>,
}

pub struct Engine<'a> {
    services: Services<'a>,
    settings: &'a Settings,
    root: &'a StateRoot,
}

impl<'a> Engine<'a> {
    pub fn new(services: Services<'a>, settings: &'a Settings, root: &'a StateRoot) -> Self {
        Self {
            services,
            settings,
            root,
        }
    }

    /// Evaluate one package and return when it wants to be looked at again.
    pub fn check(&self, package: &PackageConfig) -> Result<CheckOutcome> {
        let state = self.root.package(&package.name)?;
        let now = self.services.clock.now();

        let delta = time_until_next_check(state.last_checked()?, package.interval_secs, now);
        if delta > 0 {
            debug!(package = %package.name, delta, "not due yet");
            return Ok(CheckOutcome {
                decision: Decision::Wait,
                delta,
                update: None,
            });
        }

        state.set_last_checked(now)?;
        let delta = time_until_next_check(now, package.interval_secs, now);

        let snapshot = match self
            .services
            .metadata
            .fetch(&package.name, package.fetch_timeout(self.settings))
        {
            Ok(snapshot) => snapshot,
            Err(e) => return self.on_fetch_error(package, &state, now, e),
        };

        let watermarks = state.watermarks()?;
        let force_interval = parse_force_interval(&package.name, package.force_interval.as_deref());
        let decision = decide(&watermarks, &snapshot, force_interval, now);

        match decision {
            Decision::UpToDate => {
                info!(package = %package.name, version = %snapshot.version, "up to date");
            }
            Decision::FailedSkip => {
                warn!(
                    package = %package.name,
                    version = %snapshot.version,
                    "this version failed before, skipping until the lastfailed marker is cleared"
                );
            }
            Decision::ForcedRebuild => {
                info!(package = %package.name, version = %snapshot.version, "forced rebuild due");
            }
            Decision::NewVersion => {
                info!(package = %package.name, version = %snapshot.version, "new version upstream");
            }
            Decision::Wait | Decision::RetryLater => {}
        }

        let update = if decision.triggers_update() {
            Some(self.update(package, &state, &snapshot)?)
        } else {
            None
        };

        Ok(CheckOutcome {
            decision,
            delta,
            update,
        })
    }

    /// Seconds until `package` is due, from persisted state alone.
    pub fn next_check_delta(&self, package: &PackageConfig) -> Result<i64> {
        let state = self.root.package(&package.name)?;
        Ok(time_until_next_check(
            state.last_checked()?,
            package.interval_secs,
            self.services.clock.now(),
        ))
    }

    fn on_fetch_error(
        &self,
        package: &PackageConfig,
        state: &PackageState,
        now: i64,
        err: crate::error::AurwatchError,
    ) -> Result<CheckOutcome> {
        match self.settings.fetch_errors {
            FetchErrorPolicy::Abort => Err(err),
            FetchErrorPolicy::Retry => {
                let retry_in = self.settings.retry_delay_secs.min(package.interval_secs);
                // Backdate lastchecked so the fast path agrees with the retry delay.
                state.set_last_checked(now + retry_in - package.interval_secs)?;
                warn!(package = %package.name, retry_in, "metadata fetch failed: {}", err);
                Ok(CheckOutcome {
                    decision: Decision::RetryLater,
                    delta: retry_in,
                    update: None,
                })
            }
        }
    }

    /// Gate on the maintainer, then build. Always records the reported
    /// maintainer before returning.
    fn update(
        &self,
        package: &PackageConfig,
        state: &PackageState,
        snapshot: &Snapshot,
    ) -> Result<UpdateOutcome> {
        let verdict = maintainer::guard(
            package,
            self.settings,
            state,
            snapshot,
            self.services.notifier,
        )?;

        let outcome = match verdict {
            MaintainerVerdict::Match => {
                build::run_build(&self.services, self.settings, package, state, snapshot)
                    .map(UpdateOutcome::Built)
            }
            MaintainerVerdict::Mismatch { .. } => Ok(UpdateOutcome::MaintainerMismatch),
        };

        // Recorded even when the build step errored out.
        state.set_last_maintainer(&canonical_maintainer(snapshot.maintainer.as_deref()))?;
        outcome
    }
}
