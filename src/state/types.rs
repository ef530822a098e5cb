use serde::Serialize;

/// One scalar file inside a package's state directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    /// Wall-clock time of the last metadata poll
    LastChecked,
    /// Wall-clock time of the last build attempt
    LastBuildStarted,
    /// Upstream `LastModified` of the last successful build
    LastSuccess,
    /// Upstream `LastModified` of the last failed build
    LastFailed,
    /// Last maintainer reported upstream
    LastMaintainer,
}

impl StateKey {
    /// File name on disk.
    pub fn file_name(self) -> &'static str {
        match self {
            StateKey::LastChecked => "lastchecked",
            StateKey::LastBuildStarted => "lastbuild",
            StateKey::LastSuccess => "lastsuccess",
            StateKey::LastFailed => "lastfailed",
            StateKey::LastMaintainer => "lastmaintainer",
        }
    }
}

/// Point-in-time copy of every persisted value for one package.
///
/// `last_success` and `last_failed` are version watermarks: they hold the
/// upstream `LastModified` of the snapshot that was built, and are only ever
/// compared against other snapshots. The other two numbers are wall-clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Watermarks {
    pub last_checked: i64,
    pub last_build_started: i64,
    pub last_success: i64,
    pub last_failed: i64,
    pub last_maintainer: String,
}
