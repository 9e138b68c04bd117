use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure computing a tree's metadata-change watermark.
#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("failed to stat {}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure regenerating a tree. Each variant names the step that failed so
/// ownership problems can be told apart from content problems.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to open source {}", path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to stat source {}", path.display())]
    StatSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create destination {}", path.display())]
    CreateDest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {} to {}", from.display(), to.display())]
    CopyContent {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to set ownership on {}", path.display())]
    SetOwnership {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to set mode on {}", path.display())]
    SetMode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk {}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl SyncError {
    /// True if the content was in place but ownership could not be applied.
    pub fn is_ownership(&self) -> bool {
        matches!(self, SyncError::SetOwnership { .. })
    }
}
