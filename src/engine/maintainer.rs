//! Maintainer guard: only build packages still owned by who we expect.

use crate::config::{PackageConfig, Settings};
use crate::error::Result;
use crate::notify::{maintainer_mismatch_message, send_best_effort};
use crate::remote::Snapshot;
use crate::state::PackageState;
use crate::traits::Notifier;
use tracing::error;

/// Canonical spelling of "no maintainer" (orphaned or unset).
pub const NO_MAINTAINER: &str = "none";

pub fn canonical_maintainer(maintainer: Option<&str>) -> String {
    match maintainer.map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => NO_MAINTAINER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintainerVerdict {
    Match,
    /// `notify` is false when this mismatch was already reported
    Mismatch { notify: bool },
}

pub fn evaluate(expected: &str, reported: &str, previously_seen: &str) -> MaintainerVerdict {
    if expected == reported {
        MaintainerVerdict::Match
    } else {
        MaintainerVerdict::Mismatch {
            notify: previously_seen != reported,
        }
    }
}

/// Check the snapshot's maintainer, logging and notifying on mismatch.
///
/// Does not persist anything; the caller records the reported maintainer
/// once the whole update call is done.
pub fn guard(
    package: &PackageConfig,
    settings: &Settings,
    state: &PackageState,
    snapshot: &Snapshot,
    notifier: &dyn Notifier,
) -> Result<MaintainerVerdict> {
    let expected = canonical_maintainer(package.maintainer.as_deref());
    let reported = canonical_maintainer(snapshot.maintainer.as_deref());
    let previous = state.last_maintainer()?;

    let verdict = evaluate(&expected, &reported, &previous);
    if let MaintainerVerdict::Mismatch { notify } = verdict {
        error!(
            package = %package.name,
            expected = %expected,
            reported = %reported,
            "maintainer mismatch, not building"
        );
        if notify && let Some(to) = package.notify_target(settings) {
            let message =
                maintainer_mismatch_message(&package.name, &expected, &reported, snapshot, to);
            send_best_effort(notifier, &message);
        }
    }

    Ok(verdict)
}
