//! Ownership-preserving recursive copy.
//!
//! Directories are recreated with the source mode; everything that is not a
//! directory is copied as a regular file (symlinks are copied as the file
//! they point to). The first failure aborts the copy and leaves whatever was
//! already written in place. Callers that need an all-or-nothing result build
//! into a work directory and swap it in (see `rebuild::rebuild_atomic`).
//!
//! Only one copy may target a given destination at a time; see
//! `rebuild::DestinationLocks`.

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::error::SyncError;
use super::ownership::{self, Ownership, UnresolvedOwnershipPolicy};

// Permission bits including setuid/setgid/sticky, without the file type.
const MODE_MASK: u32 = 0o7777;

/// Counts of what a [`Synchronizer::synchronize`] call wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub dirs: u64,
    pub files: u64,
    pub bytes: u64,
}

/// Copies files and trees, assigning each destination entry its source owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronizer {
    policy: UnresolvedOwnershipPolicy,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnresolvedOwnershipPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnresolvedOwnershipPolicy {
        self.policy
    }

    /// Copy one file's content, mode and owner. Returns the bytes written.
    ///
    /// The destination is created or truncated. A read-only destination left
    /// by an earlier copy is replaced instead. Ownership is applied before
    /// the destination handle is released, and a failure to apply it fails
    /// the copy. The mode is written again after `chown`, which clears
    /// setuid/setgid bits.
    pub fn copy_file(&self, source: &Path, dest: &Path) -> Result<u64, SyncError> {
        debug!("Copying '{}' to '{}'", source.display(), dest.display());

        let mut src = File::open(source).map_err(|e| SyncError::OpenSource {
            path: source.to_path_buf(),
            source: e,
        })?;
        let meta = src.metadata().map_err(|e| SyncError::StatSource {
            path: source.to_path_buf(),
            source: e,
        })?;
        let mode = meta.permissions().mode() & MODE_MASK;

        let mut dst = create_dest(dest, mode).map_err(|e| SyncError::CreateDest {
            path: dest.to_path_buf(),
            source: e,
        })?;

        let content_error = |e| SyncError::CopyContent {
            from: source.to_path_buf(),
            to: dest.to_path_buf(),
            source: e,
        };
        let bytes = io::copy(&mut src, &mut dst).map_err(content_error)?;
        dst.sync_all().map_err(content_error)?;

        ownership::copy_ownership(source, dest, self.policy)?;
        set_mode(dest, mode)?;

        Ok(bytes)
    }

    /// Create `dest` (and missing parents) as a copy of the directory `source`.
    pub fn copy_dir(&self, source: &Path, dest: &Path) -> Result<Ownership, SyncError> {
        debug!("Creating directory: {}", dest.display());

        let meta = fs::metadata(source).map_err(|e| SyncError::StatSource {
            path: source.to_path_buf(),
            source: e,
        })?;
        let mode = meta.permissions().mode() & MODE_MASK;

        DirBuilder::new()
            .recursive(true)
            .mode(mode)
            .create(dest)
            .map_err(|e| SyncError::CreateDir {
                path: dest.to_path_buf(),
                source: e,
            })?;

        let owner = ownership::copy_ownership(source, dest, self.policy)?;
        set_mode(dest, mode)?;
        Ok(owner)
    }

    /// Reproduce the tree at `source_root` under `dest_root`.
    ///
    /// `dest_root` mirrors `source_root` itself: `source_root/etc/hosts`
    /// lands at `dest_root/etc/hosts`. Existing destination files are
    /// overwritten; entries absent from the source are left alone.
    pub fn synchronize(&self, source_root: &Path, dest_root: &Path) -> Result<SyncStats, SyncError> {
        let mut stats = SyncStats::default();

        for entry in WalkDir::new(source_root) {
            let entry = entry.map_err(|e| SyncError::Walk {
                root: source_root.to_path_buf(),
                source: e,
            })?;
            let location = entry.path();
            let target = mirror_path(source_root, dest_root, location);

            if entry.file_type().is_dir() {
                self.copy_dir(location, &target)?;
                stats.dirs += 1;
            } else {
                debug!("Writing file: {}", target.display());
                stats.bytes += self.copy_file(location, &target)?;
                stats.files += 1;
            }
        }

        debug!(
            "Synchronized {} -> {}: {} dirs, {} files, {} bytes",
            source_root.display(),
            dest_root.display(),
            stats.dirs,
            stats.files,
            stats.bytes
        );
        Ok(stats)
    }
}

/// Copy one file with the default ownership policy.
pub fn copy_file(source: &Path, dest: &Path) -> Result<u64, SyncError> {
    Synchronizer::new().copy_file(source, dest)
}

/// Copy a whole tree with the default ownership policy.
pub fn synchronize(source_root: &Path, dest_root: &Path) -> Result<SyncStats, SyncError> {
    Synchronizer::new().synchronize(source_root, dest_root)
}

fn create_dest(dest: &Path, mode: u32) -> io::Result<File> {
    let open = || {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(mode)
            .open(dest)
    };
    match open() {
        // Without CAP_DAC_OVERRIDE a 0444 file from the previous run cannot be
        // truncated, but its directory entry can be replaced.
        Err(e)
            if e.kind() == io::ErrorKind::PermissionDenied
                && fs::symlink_metadata(dest).is_ok() =>
        {
            debug!("Replacing read-only destination {}", dest.display());
            fs::remove_file(dest)?;
            open()
        }
        result => result,
    }
}

fn set_mode(path: &Path, mode: u32) -> Result<(), SyncError> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| SyncError::SetMode {
        path: path.to_path_buf(),
        source: e,
    })
}

// Walkdir entries always start with the root they were walked from.
fn mirror_path(source_root: &Path, dest_root: &Path, location: &Path) -> PathBuf {
    match location.strip_prefix(source_root) {
        Ok(rel) if rel.as_os_str().is_empty() => dest_root.to_path_buf(),
        Ok(rel) => dest_root.join(rel),
        Err(_) => dest_root.join(location.file_name().unwrap_or_default()),
    }
}
