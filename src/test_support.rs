//! In-memory fakes for the collaborator traits.

use crate::error::{AurwatchError, Result};
use crate::notify::Message;
use crate::remote::Snapshot;
use crate::traits::{Clock, CommandRunner, CommandSpec, MetadataFetcher, Notifier, Services, SourceFetcher};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn snapshot(last_modified: i64, maintainer: Option<&str>) -> Snapshot {
    Snapshot {
        package_base: "yay".into(),
        version: format!("{}-1", last_modified),
        last_modified,
        maintainer: maintainer.map(str::to_string),
        url_path: "/cgit/aur.git/snapshot/yay.tar.gz".into(),
    }
}

pub struct FakeClock(pub Cell<i64>);

impl FakeClock {
    pub fn at(now: i64) -> Self {
        Self(Cell::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.set(now);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> i64 {
        self.0.get()
    }
}

pub struct FakeMetadata {
    pub response: RefCell<std::result::Result<Snapshot, String>>,
    pub calls: Cell<usize>,
}

impl FakeMetadata {
    pub fn returning(snapshot: Snapshot) -> Self {
        Self {
            response: RefCell::new(Ok(snapshot)),
            calls: Cell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: RefCell::new(Err(reason.to_string())),
            calls: Cell::new(0),
        }
    }

    pub fn set(&self, snapshot: Snapshot) {
        *self.response.borrow_mut() = Ok(snapshot);
    }
}

impl MetadataFetcher for FakeMetadata {
    fn fetch(&self, _name: &str, _timeout: Duration) -> Result<Snapshot> {
        self.calls.set(self.calls.get() + 1);
        self.response
            .borrow()
            .clone()
            .map_err(AurwatchError::RemoteFetchError)
    }
}

#[derive(Default)]
pub struct FakeSources {
    pub fail: Cell<bool>,
    pub calls: Cell<usize>,
}

impl SourceFetcher for FakeSources {
    fn fetch_sources(&self, snapshot: &Snapshot, dest: &Path) -> Result<PathBuf> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(AurwatchError::RemoteFetchError("snapshot download failed".into()));
        }
        let dir = dest.join(&snapshot.package_base);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Records every command; results are popped from `results` (default success).
#[derive(Default)]
pub struct FakeRunner {
    pub commands: RefCell<Vec<CommandSpec>>,
    pub results: RefCell<VecDeque<bool>>,
}

impl FakeRunner {
    pub fn with_results(results: &[bool]) -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            results: RefCell::new(results.iter().copied().collect()),
        }
    }

    pub fn runs(&self) -> usize {
        self.commands.borrow().len()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec, log_path: &Path) -> Result<bool> {
        self.commands.borrow_mut().push(spec.clone());
        let mut log = OpenOptions::new().create(true).append(true).open(log_path)?;
        writeln!(log, "fake output of {}", spec)?;
        Ok(self.results.borrow_mut().pop_front().unwrap_or(true))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<Message>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &Message) -> Result<()> {
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}

/// All fakes in one place.
pub struct Harness {
    pub clock: FakeClock,
    pub metadata: FakeMetadata,
    pub sources: FakeSources,
    pub runner: FakeRunner,
    pub notifier: RecordingNotifier,
}

impl Harness {
    pub fn new(now: i64, snapshot: Snapshot) -> Self {
        Self {
            clock: FakeClock::at(now),
            metadata: FakeMetadata::returning(snapshot),
            sources: FakeSources::default(),
            runner: FakeRunner::default(),
            notifier: RecordingNotifier::default(),
        }
    }

    pub fn services(&self) -> Services<'_> {
        Services {
            clock: &self.clock,
            metadata: &self.metadata,
            sources: &self.sources,
            runner: &self.runner,
            notifier: &self.notifier,
        }
    }
}
