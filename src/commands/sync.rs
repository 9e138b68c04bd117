//! Sync and status commands - regenerate VNFS trees and report staleness.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::rebuild::{self, DestinationLocks, RebuildOutcome};
use crate::sync::{metadata_change_watermark, Synchronizer};

/// How `sync` writes the destination.
pub enum SyncMode {
    /// Copy over the existing destination.
    InPlace,
    /// Build next to the destination and swap it in.
    Atomic,
}

/// Execute the sync command.
pub fn cmd_sync(source: &Path, dest: &Path, force: bool, mode: SyncMode) -> Result<()> {
    let synchronizer = Synchronizer::new();
    let locks = DestinationLocks::new();

    if force {
        let _guard = locks.lock(dest);
        let stats = synchronizer
            .synchronize(source, dest)
            .with_context(|| format!("Failed to sync {} to {}", source.display(), dest.display()))?;
        println!(
            "Synced {} -> {} ({} dirs, {} files, {} bytes)",
            source.display(),
            dest.display(),
            stats.dirs,
            stats.files,
            stats.bytes
        );
        return Ok(());
    }

    let outcome = match mode {
        SyncMode::InPlace => rebuild::rebuild_if_stale(source, dest, &locks, &synchronizer)?,
        SyncMode::Atomic => rebuild::rebuild_atomic(source, dest, &locks, &synchronizer)?,
    };

    match outcome {
        RebuildOutcome::UpToDate => println!("{} is up to date", dest.display()),
        RebuildOutcome::Rebuilt(stats) => println!(
            "Rebuilt {} ({} dirs, {} files, {} bytes)",
            dest.display(),
            stats.dirs,
            stats.files,
            stats.bytes
        ),
    }
    Ok(())
}

/// Execute the status command.
pub fn cmd_status(artifact: &Path, source: &Path) -> Result<()> {
    for path in [source, artifact] {
        match metadata_change_watermark(path) {
            Ok(t) => {
                let secs = t
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs_f64())
                    .unwrap_or(0.0);
                println!("  {:<40} changed at {:.3}", path.display(), secs);
            }
            Err(e) => println!("  {:<40} {}", path.display(), e),
        }
    }

    if rebuild::needs_rebuild(source, artifact) {
        println!("{}: STALE (rebuild required)", artifact.display());
    } else {
        println!("{}: up to date", artifact.display());
    }
    Ok(())
}
