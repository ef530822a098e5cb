use crate::error::{AurwatchError, Result};
use crate::project_identity;
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new().ok_or_else(|| {
        AurwatchError::PathError("Could not determine user home directory".to_string())
    })?;

    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| AurwatchError::PathError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", project_identity::CONFIG_DIR_NAME).ok_or_else(|| {
        AurwatchError::PathError("Could not determine project directories".to_string())
    })
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Config file location: `$AURWATCH_CONFIG`, else the per-user config dir.
pub fn config_file() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(project_identity::env_key("CONFIG"))
        && !path.trim().is_empty()
    {
        return expand_home(Path::new(&path));
    }
    Ok(config_dir()?.join(project_identity::CONFIG_FILE_BASENAME))
}

pub fn default_state_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("packages"))
}
