//! Path checks and tree listings.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Check if `path` exists as a directory (following symlinks).
///
/// An empty string is never a directory.
pub fn is_dir(path: &str) -> bool {
    debug!("Checking if path exists as a directory: {}", path);

    if path.is_empty() {
        return false;
    }
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Check if `path` exists and is not a directory (following symlinks).
pub fn is_file(path: &str) -> bool {
    debug!("Checking if path exists as a file: {}", path);

    if path.is_empty() {
        return false;
    }
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// List every entry under `root`, relative to it.
///
/// Directories carry a trailing `/`. The root itself is not listed. If the
/// root cannot be read the listing is empty; entries that fail mid-walk end
/// the listing at that point.
pub fn find_files(root: &Path) -> Vec<String> {
    let mut ret = Vec::new();

    if !root.is_dir() {
        warn!("Could not list directory: {}", root.display());
        return ret;
    }

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Stopped listing {}: {}", root.display(), e);
                break;
            }
        };
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel = rel.to_string_lossy();

        if entry.path().is_dir() {
            debug!("find_files() found directory: {}", rel);
            ret.push(format!("{}/", rel));
        } else {
            debug!("find_files() found file: {}", rel);
            ret.push(rel.into_owned());
        }
    }

    ret
}
