use crate::error::{AurwatchError, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tar::Archive;

/// Unpack a gzip'd AUR snapshot into a clean `dest`.
///
/// AUR snapshots contain a single `<package_base>/` directory holding the
/// PKGBUILD; that directory is returned.
pub fn extract_snapshot<R: Read>(reader: R, dest: &Path, package_base: &str) -> Result<PathBuf> {
    match fs::remove_dir_all(dest) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(AurwatchError::IoError {
                path: dest.to_path_buf(),
                source: e,
            });
        }
    }
    fs::create_dir_all(dest).map_err(|e| AurwatchError::IoError {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let mut archive = Archive::new(GzDecoder::new(reader));
    archive.unpack(dest).map_err(|e| AurwatchError::IoError {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let source_dir = dest.join(package_base);
    if source_dir.is_dir() {
        Ok(source_dir)
    } else {
        Err(AurwatchError::RemoteFetchError(format!(
            "Source snapshot for '{}' has no '{}/' directory",
            package_base, package_base
        )))
    }
}
