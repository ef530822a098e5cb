use crate::error::{AurwatchError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Append-only build log, named after the build start time.
#[derive(Debug, Clone)]
pub struct BuildLog {
    path: PathBuf,
}

pub fn log_file_name(started: i64) -> String {
    match chrono::DateTime::from_timestamp(started, 0) {
        Some(dt) => format!("{}.log", dt.format("%Y%m%d-%H%M%S")),
        None => format!("{}.log", started),
    }
}

impl BuildLog {
    pub fn create(dir: &Path, started: i64) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| AurwatchError::IoError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let log = Self {
            path: dir.join(log_file_name(started)),
        };
        log.note(&format!("build started at {}", started))?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line of our own commentary.
    pub fn note(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AurwatchError::IoError {
                path: self.path.clone(),
                source: e,
            })?;
        writeln!(file, "==> {}", line)?;
        Ok(())
    }

    pub fn command_started(&self, command: &str) -> Result<()> {
        self.note(&format!("running: {}", command))
    }

    pub fn command_finished(&self, success: bool, elapsed: Duration) -> Result<()> {
        self.note(&format!(
            "{} after {}s",
            if success { "succeeded" } else { "failed" },
            elapsed.as_secs()
        ))
    }
}
