mod locking;

use crate::error::{AurwatchError, Result};
use crate::state::types::{StateKey, Watermarks};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub use locking::{RootLock, acquire_root_lock};

const LOG_DIR_NAME: &str = "log";
const WORK_DIR_NAME: &str = "work";

/// Root directory holding one sub-directory per package.
#[derive(Debug, Clone)]
pub struct StateRoot {
    dir: PathBuf,
}

impl StateRoot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Open (and lazily create) the state directory of one package.
    pub fn package(&self, name: &str) -> Result<PackageState> {
        validate_package_name(name)?;
        let dir = self.dir.join(name);
        fs::create_dir_all(&dir).map_err(|e| AurwatchError::IoError {
            path: dir.clone(),
            source: e,
        })?;
        Ok(PackageState { dir })
    }

    /// Like [`StateRoot::package`] but never creates anything; `None` when
    /// the package has no state yet.
    pub fn existing(&self, name: &str) -> Result<Option<PackageState>> {
        validate_package_name(name)?;
        let dir = self.dir.join(name);
        Ok(dir.is_dir().then_some(PackageState { dir }))
    }
}

/// Package names become directory names; keep them to one path component.
fn validate_package_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0');
    if valid {
        Ok(())
    } else {
        Err(AurwatchError::PathError(format!(
            "Invalid package name for state directory: '{}'",
            name
        )))
    }
}

/// File-per-scalar store for one package.
///
/// A missing file reads as the default value (0 or empty string).
#[derive(Debug, Clone)]
pub struct PackageState {
    dir: PathBuf,
}

impl PackageState {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.join(LOG_DIR_NAME)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.join(WORK_DIR_NAME)
    }

    fn read_raw(&self, key: StateKey) -> Result<Option<String>> {
        let path = self.dir.join(key.file_name());
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AurwatchError::IoError { path, source: e }),
        }
    }

    pub fn get_i64(&self, key: StateKey) -> Result<i64> {
        let Some(raw) = self.read_raw(key)? else {
            return Ok(0);
        };
        if raw.is_empty() {
            return Ok(0);
        }
        match raw.parse::<i64>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(
                    path = %self.dir.join(key.file_name()).display(),
                    value = %raw,
                    "unparseable state value, treating as 0"
                );
                Ok(0)
            }
        }
    }

    pub fn get_string(&self, key: StateKey) -> Result<String> {
        Ok(self.read_raw(key)?.unwrap_or_default())
    }

    pub fn set_i64(&self, key: StateKey, value: i64) -> Result<()> {
        self.write_atomically(key, &value.to_string())
    }

    pub fn set_string(&self, key: StateKey, value: &str) -> Result<()> {
        self.write_atomically(key, value)
    }

    /// Remove a marker so it reads as default again.
    pub fn clear(&self, key: StateKey) -> Result<bool> {
        let path = self.dir.join(key.file_name());
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AurwatchError::IoError { path, source: e }),
        }
    }

    fn write_atomically(&self, key: StateKey, value: &str) -> Result<()> {
        let path = self.dir.join(key.file_name());
        let tmp_path = self.dir.join(format!(".{}.tmp", key.file_name()));

        let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| AurwatchError::IoError {
            path: tmp_path.clone(),
            source: e,
        })?;
        writeln!(tmp_file, "{}", value)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path).map_err(|e| AurwatchError::IoError { path, source: e })
    }

    pub fn last_checked(&self) -> Result<i64> {
        self.get_i64(StateKey::LastChecked)
    }

    pub fn set_last_checked(&self, ts: i64) -> Result<()> {
        self.set_i64(StateKey::LastChecked, ts)
    }

    pub fn last_build_started(&self) -> Result<i64> {
        self.get_i64(StateKey::LastBuildStarted)
    }

    pub fn set_last_build_started(&self, ts: i64) -> Result<()> {
        self.set_i64(StateKey::LastBuildStarted, ts)
    }

    pub fn last_success(&self) -> Result<i64> {
        self.get_i64(StateKey::LastSuccess)
    }

    pub fn set_last_success(&self, watermark: i64) -> Result<()> {
        self.set_i64(StateKey::LastSuccess, watermark)
    }

    pub fn last_failed(&self) -> Result<i64> {
        self.get_i64(StateKey::LastFailed)
    }

    pub fn set_last_failed(&self, watermark: i64) -> Result<()> {
        self.set_i64(StateKey::LastFailed, watermark)
    }

    pub fn last_maintainer(&self) -> Result<String> {
        self.get_string(StateKey::LastMaintainer)
    }

    pub fn set_last_maintainer(&self, maintainer: &str) -> Result<()> {
        self.set_string(StateKey::LastMaintainer, maintainer)
    }

    /// Operator retry: forget that the current upstream version failed.
    pub fn clear_failed(&self) -> Result<bool> {
        self.clear(StateKey::LastFailed)
    }

    pub fn watermarks(&self) -> Result<Watermarks> {
        Ok(Watermarks {
            last_checked: self.last_checked()?,
            last_build_started: self.last_build_started()?,
            last_success: self.last_success()?,
            last_failed: self.last_failed()?,
            last_maintainer: self.last_maintainer()?,
        })
    }
}
