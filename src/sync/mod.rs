//! VNFS artifact synchronization.
//!
//! - [`watermark`]: decides whether a generated tree is older than its source
//! - [`copy`]: regenerates a tree with ownership copied from the source
//! - [`ownership`]: uid/gid resolution and the fallback policy

pub mod copy;
pub mod error;
pub mod ownership;
pub mod watermark;

pub use copy::{copy_file, synchronize, SyncStats, Synchronizer};
pub use error::{SyncError, WatermarkError};
pub use ownership::{copy_ownership, resolve_ownership, Ownership, UnresolvedOwnershipPolicy};
pub use watermark::{metadata_change_watermark, path_is_older};
