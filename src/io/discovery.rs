use std::path::{Path, PathBuf};

use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::core::ScanError;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

#[cfg(unix)]
fn is_executable(entry: &DirEntry) -> Result<bool, ScanError> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = entry.metadata()?;
    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_entry: &DirEntry) -> Result<bool, ScanError> {
    Ok(false)
}

/// Regular, non-hidden, non-executable files below `root` with the given
/// extension, following symlinks. Sorted by path.
pub fn discover_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::ConfigError(format!(
            "data dir {} does not exist",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() || is_hidden(&entry) {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if is_executable(&entry)? {
            debug!("{}: skipped because executable", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}
