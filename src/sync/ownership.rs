//! Owning user/group resolution for copied entries.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use tracing::debug;

use super::error::SyncError;

/// Numeric owner of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

impl Ownership {
    pub const ROOT: Ownership = Ownership { uid: 0, gid: 0 };

    /// Owner as reported by the platform, if it reports one.
    #[cfg(unix)]
    pub fn reported(meta: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            uid: meta.uid(),
            gid: meta.gid(),
        })
    }

    #[cfg(not(unix))]
    pub fn reported(_meta: &Metadata) -> Option<Self> {
        None
    }
}

/// What to assign when a source entry's owner cannot be determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedOwnershipPolicy {
    /// Provisioning artifacts default to root ownership.
    #[default]
    UseRootIdentifiers,
}

impl UnresolvedOwnershipPolicy {
    pub fn resolve(self, reported: Option<Ownership>) -> Ownership {
        match (reported, self) {
            (Some(owner), _) => owner,
            (None, UnresolvedOwnershipPolicy::UseRootIdentifiers) => Ownership::ROOT,
        }
    }
}

/// Owner to assign for entries copied from `source`.
pub fn resolve_ownership(source: &Path, policy: UnresolvedOwnershipPolicy) -> io::Result<Ownership> {
    let meta = fs::metadata(source)?;
    Ok(policy.resolve(Ownership::reported(&meta)))
}

/// Give `dest` the owner of `source`.
pub fn copy_ownership(
    source: &Path,
    dest: &Path,
    policy: UnresolvedOwnershipPolicy,
) -> Result<Ownership, SyncError> {
    let owner = resolve_ownership(source, policy).map_err(|e| SyncError::StatSource {
        path: source.to_path_buf(),
        source: e,
    })?;

    debug!("Chown {}:{} '{}'", owner.uid, owner.gid, dest.display());
    std::os::unix::fs::chown(dest, Some(owner.uid), Some(owner.gid)).map_err(|e| {
        SyncError::SetOwnership {
            path: dest.to_path_buf(),
            source: e,
        }
    })?;

    Ok(owner)
}
