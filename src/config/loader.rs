use crate::config::kdl::parse_config_with_path;
use crate::config::types::Config;
use crate::error::{AurwatchError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(AurwatchError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| AurwatchError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_with_path(&content, Some(&path.display().to_string()))
}

pub(crate) fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Keeps the active config and reloads it when the file's mtime moves.
pub struct ConfigReloader {
    path: PathBuf,
    mtime: Option<SystemTime>,
    current: Config,
}

impl ConfigReloader {
    /// Initial load. Failure here is fatal to the caller.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mtime = modified_time(&path);
        let current = load_config(&path)?;
        Ok(Self {
            path,
            mtime,
            current,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.current
    }

    /// Reload if the file changed since the last successful (or attempted) load.
    ///
    /// Returns `Ok(true)` when a new config became active. A broken file keeps
    /// the previous config and surfaces the error; the mtime is still recorded
    /// so the same broken revision is not re-parsed every iteration.
    pub fn reload_if_changed(&mut self) -> Result<bool> {
        let mtime = modified_time(&self.path);
        if mtime == self.mtime {
            return Ok(false);
        }
        self.mtime = mtime;

        let config = load_config(&self.path)?;
        let changed = config != self.current;
        self.current = config;
        Ok(changed)
    }
}
