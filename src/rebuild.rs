//! Rebuild orchestration for generated VNFS artifacts.
//!
//! Ties staleness detection to the copier: an artifact is regenerated when
//! it is missing or its metadata-change watermark predates its source's.
//! At most one rebuild runs per destination; [`DestinationLocks`] enforces
//! that across threads.

use std::collections::HashSet;
use std::fs;
use std::path::{self, Path, PathBuf};
use std::sync::{Condvar, Mutex, PoisonError};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::common::temp::{cleanup_work_dir, prepare_work_dir, sibling, swap_into_place};
use crate::sync::{path_is_older, SyncStats, Synchronizer};
use crate::timing::Timer;

/// Result of a [`rebuild_if_stale`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    UpToDate,
    Rebuilt(SyncStats),
}

impl RebuildOutcome {
    pub fn rebuilt(&self) -> bool {
        matches!(self, RebuildOutcome::Rebuilt(_))
    }
}

/// Mutual exclusion keyed by destination path.
///
/// Rebuilds of different destinations proceed in parallel; a second writer
/// for the same destination waits until the first guard is dropped.
#[derive(Debug, Default)]
pub struct DestinationLocks {
    busy: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

/// Held while a destination is being written.
pub struct DestinationGuard<'a> {
    locks: &'a DestinationLocks,
    dest: PathBuf,
}

impl DestinationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until no other holder writes `dest`.
    ///
    /// Different spellings of one tree (relative, absolute, through a
    /// symlinked parent) share a lock.
    pub fn lock(&self, dest: &Path) -> DestinationGuard<'_> {
        let key = lock_key(dest);
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        while busy.contains(&key) {
            debug!("Waiting for another rebuild of {}", key.display());
            busy = self
                .released
                .wait(busy)
                .unwrap_or_else(PoisonError::into_inner);
        }
        busy.insert(key.clone());

        DestinationGuard {
            locks: self,
            dest: key,
        }
    }

    /// Number of destinations currently locked.
    pub fn held(&self) -> usize {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for DestinationGuard<'_> {
    fn drop(&mut self) {
        let mut busy = self
            .locks
            .busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        busy.remove(&self.dest);
        self.locks.released.notify_all();
    }
}

// The destination may not exist yet, so fall back to its parent and then
// to a purely lexical absolute path.
fn lock_key(dest: &Path) -> PathBuf {
    if let Ok(real) = fs::canonicalize(dest) {
        return real;
    }
    if let (Some(parent), Some(name)) = (dest.parent(), dest.file_name()) {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(real) = fs::canonicalize(parent) {
            return real.join(name);
        }
    }
    path::absolute(dest).unwrap_or_else(|_| dest.to_path_buf())
}

/// Check if `artifact` must be regenerated from `source`.
pub fn needs_rebuild(source: &Path, artifact: &Path) -> bool {
    if !artifact.exists() {
        debug!("{} does not exist, rebuild required", artifact.display());
        return true;
    }
    path_is_older(artifact, source)
}

/// Regenerate `artifact` from `source` in place if it is stale.
///
/// A failed copy leaves a partially written artifact.
pub fn rebuild_if_stale(
    source: &Path,
    artifact: &Path,
    locks: &DestinationLocks,
    synchronizer: &Synchronizer,
) -> Result<RebuildOutcome> {
    let _guard = locks.lock(artifact);

    if !needs_rebuild(source, artifact) {
        debug!("{} is up to date", artifact.display());
        return Ok(RebuildOutcome::UpToDate);
    }

    info!("Rebuilding {} from {}", artifact.display(), source.display());
    let timer = Timer::start(&format!("rebuild {}", artifact.display()));
    let stats = synchronizer
        .synchronize(source, artifact)
        .with_context(|| format!("Failed to rebuild {}", artifact.display()))?;
    timer.finish();

    Ok(RebuildOutcome::Rebuilt(stats))
}

/// Like [`rebuild_if_stale`], but builds into a sibling work directory and
/// swaps it into place, so a failure leaves the previous artifact intact.
///
/// The result contains exactly the source tree; stale extra files in the
/// old artifact do not survive.
pub fn rebuild_atomic(
    source: &Path,
    artifact: &Path,
    locks: &DestinationLocks,
    synchronizer: &Synchronizer,
) -> Result<RebuildOutcome> {
    let _guard = locks.lock(artifact);

    if !needs_rebuild(source, artifact) {
        debug!("{} is up to date", artifact.display());
        return Ok(RebuildOutcome::UpToDate);
    }

    let parent = artifact
        .parent()
        .with_context(|| format!("{} has no parent directory", artifact.display()))?;
    let name = sibling(artifact, ".new");
    let name = name
        .file_name()
        .with_context(|| format!("{} has no file name", artifact.display()))?
        .to_string_lossy();
    let staged = prepare_work_dir(parent, &name)?;

    info!(
        "Rebuilding {} from {} (staged in {})",
        artifact.display(),
        source.display(),
        staged.display()
    );
    let timer = Timer::start(&format!("rebuild {}", artifact.display()));

    let stats = match synchronizer.synchronize(source, &staged) {
        Ok(stats) => stats,
        Err(e) => {
            cleanup_work_dir(&staged);
            return Err(e).with_context(|| format!("Failed to rebuild {}", artifact.display()));
        }
    };
    if let Err(e) = swap_into_place(&staged, artifact) {
        cleanup_work_dir(&staged);
        return Err(e);
    }
    timer.finish();

    Ok(RebuildOutcome::Rebuilt(stats))
}
