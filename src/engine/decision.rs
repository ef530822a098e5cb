use crate::remote::Snapshot;
use crate::state::Watermarks;
use std::fmt;
use tracing::warn;

/// Outcome of evaluating one package at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Not due yet; nothing was fetched or written
    Wait,
    /// Metadata fetch failed and the retry policy is active
    RetryLater,
    /// Last successful build covers the upstream version
    UpToDate,
    /// This exact upstream version already failed to build
    FailedSkip,
    /// Up to date, but the force-rebuild interval has elapsed
    ForcedRebuild,
    /// Upstream is strictly newer than both watermarks
    NewVersion,
}

impl Decision {
    pub fn triggers_update(self) -> bool {
        matches!(self, Decision::ForcedRebuild | Decision::NewVersion)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Wait => "wait",
            Decision::RetryLater => "retry-later",
            Decision::UpToDate => "up-to-date",
            Decision::FailedSkip => "failed-skip",
            Decision::ForcedRebuild => "forced-rebuild",
            Decision::NewVersion => "new-version",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seconds until the package is due again; zero or negative means due now.
pub fn time_until_next_check(last_checked: i64, interval_secs: i64, now: i64) -> i64 {
    last_checked.saturating_add(interval_secs).saturating_sub(now)
}

/// Interpret the raw `force-interval` value. Anything that is not a positive
/// integer disables forced rebuilds for this evaluation.
pub fn parse_force_interval(package: &str, raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    match raw.parse::<i64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            warn!(
                package,
                value = raw,
                "ignoring invalid force-interval (expected positive seconds)"
            );
            None
        }
    }
}

/// Compare a fresh snapshot against the persisted watermarks.
///
/// `last_success` wins over `last_failed`; equal values count as handled.
pub fn decide(
    watermarks: &Watermarks,
    snapshot: &Snapshot,
    force_interval: Option<i64>,
    now: i64,
) -> Decision {
    if watermarks.last_success >= snapshot.last_modified {
        let force_due = force_interval
            .is_some_and(|f| watermarks.last_build_started.saturating_add(f) <= now);
        if force_due {
            Decision::ForcedRebuild
        } else {
            Decision::UpToDate
        }
    } else if watermarks.last_failed >= snapshot.last_modified {
        Decision::FailedSkip
    } else {
        Decision::NewVersion
    }
}
