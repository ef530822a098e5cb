use crate::error::{AurwatchError, Result};
use crate::project_identity;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = ".lock";

/// Exclusive ownership of a state root. Released (and removed) on drop.
#[derive(Debug)]
pub struct RootLock {
    _file: std::fs::File,
    path: PathBuf,
}

impl Drop for RootLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Take the state-root lock, failing fast if another daemon holds it.
pub fn acquire_root_lock(root: &Path) -> Result<RootLock> {
    fs::create_dir_all(root).map_err(|e| AurwatchError::IoError {
        path: root.to_path_buf(),
        source: e,
    })?;
    let lock_path = root.join(LOCK_FILE_NAME);

    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| AurwatchError::IoError {
            path: lock_path.clone(),
            source: e,
        })?;

    if lock_file.try_lock_exclusive().is_err() {
        let holder = fs::read_to_string(&lock_path).unwrap_or_default();
        let holder = holder.trim();
        let pid_hint = if holder.is_empty() {
            String::new()
        } else {
            format!(" (pid {})", holder)
        };
        return Err(AurwatchError::LockError(format!(
            "Another {} process is already using {}{}",
            project_identity::BINARY_NAME,
            root.display(),
            pid_hint
        )));
    }

    lock_file.set_len(0)?;
    let _ = writeln!(&lock_file, "{}", std::process::id());

    Ok(RootLock {
        _file: lock_file,
        path: lock_path,
    })
}

#[cfg(test)]
mod tests {
    use super::acquire_root_lock;
    use tempfile::tempdir;

    #[test]
    fn lock_contention_returns_error() {
        let dir = tempdir().expect("tempdir");

        let _lock = acquire_root_lock(dir.path()).expect("first lock");
        match acquire_root_lock(dir.path()) {
            Ok(_) => panic!("second lock should fail"),
            Err(err) => assert!(err.to_string().contains("already using")),
        }
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempdir().expect("tempdir");
        drop(acquire_root_lock(dir.path()).expect("first lock"));
        assert!(acquire_root_lock(dir.path()).is_ok());
    }
}
