//! Seams between the update logic and the outside world
//!
//! The decision engine, maintainer guard, build orchestration and scheduler
//! only talk to the network, the process table, SMTP and the wall clock
//! through these traits, so every decision path can be driven from tests
//! with in-memory fakes.

use crate::error::Result;
use crate::notify::Message;
use crate::remote::Snapshot;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source of "now" as Unix seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fetches the current upstream view of one package.
pub trait MetadataFetcher {
    fn fetch(&self, name: &str, timeout: Duration) -> Result<Snapshot>;
}

/// Retrieves and unpacks the build inputs of a snapshot.
pub trait SourceFetcher {
    /// Extract the sources below `dest`; returns the directory to build in.
    fn fetch_sources(&self, snapshot: &Snapshot, dest: &Path) -> Result<PathBuf>;
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shlex::try_quote(&self.program).unwrap_or_default())?;
        for arg in &self.args {
            write!(f, " {}", shlex::try_quote(arg).unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Runs external commands with output captured to a log file.
pub trait CommandRunner {
    /// Run to completion; `Ok(true)` on a zero exit status.
    fn run(&self, spec: &CommandSpec, log_path: &Path) -> Result<bool>;
}

/// Ships operator notifications.
pub trait Notifier {
    fn send(&self, message: &Message) -> Result<()>;
}

/// Everything one check/build cycle needs from the outside world.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub clock: &'a dyn Clock,
    pub metadata: &'a dyn MetadataFetcher,
    pub sources: &'a dyn SourceFetcher,
    pub runner: &'a dyn CommandRunner,
    pub notifier: &'a dyn Notifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_spec_display_quotes_arguments() {
        let spec = CommandSpec {
            program: "sh".into(),
            args: vec!["-c".into(), "makepkg -s".into()],
            cwd: PathBuf::from("/tmp"),
        };
        let shown = spec.to_string();
        assert!(shown.starts_with("sh -c "));
        assert!(shown.contains("makepkg -s"));
        assert_ne!(shown, "sh -c makepkg -s");
    }
}
