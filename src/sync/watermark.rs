//! Metadata-change watermarks.
//!
//! The watermark of a tree is the latest status-change time (`st_ctime`)
//! of any entry under it. ctime moves on ownership and mode changes as well
//! as content writes, so an ownership-only fix to a source tree still marks
//! its artifacts stale.

use std::fs::{self, Metadata};
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;
use walkdir::WalkDir;

use super::error::WatermarkError;

/// Latest status-change time of `root` and every entry below it.
///
/// Fails if the root cannot be stat'ed or, for a directory, listed. Entries
/// that vanish or cannot be stat'ed during the walk are skipped.
pub fn metadata_change_watermark(root: &Path) -> Result<SystemTime, WatermarkError> {
    let meta = fs::metadata(root).map_err(|source| WatermarkError::Stat {
        path: root.to_path_buf(),
        source,
    })?;
    if meta.is_dir() {
        fs::read_dir(root).map_err(|source| WatermarkError::ReadDir {
            path: root.to_path_buf(),
            source,
        })?;
    }

    let mut latest = change_time(&meta);

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        debug!("Checking {}", entry.path().display());
        // Follow symlinks so a link's target counts, not the link itself.
        match fs::metadata(entry.path()) {
            Ok(m) => latest = latest.max(change_time(&m)),
            Err(e) => debug!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    Ok(latest)
}

/// True if `path` was last changed strictly before `compare`.
///
/// Any failure computing either watermark is logged and answers `false`:
/// an unreadable tree never triggers a rebuild.
pub fn path_is_older(path: &Path, compare: &Path) -> bool {
    debug!(
        "Comparing times on paths: '{}' - '{}'",
        path.display(),
        compare.display()
    );

    let first = match metadata_change_watermark(path) {
        Ok(t) => t,
        Err(e) => {
            debug!("{}", e);
            return false;
        }
    };
    let second = match metadata_change_watermark(compare) {
        Ok(t) => t,
        Err(e) => {
            debug!("{}", e);
            return false;
        }
    };

    first < second
}

fn change_time(meta: &Metadata) -> SystemTime {
    let nanos = Duration::from_nanos(meta.ctime_nsec().clamp(0, 999_999_999) as u64);
    let secs = meta.ctime();
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64) + nanos
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + nanos
    }
}
