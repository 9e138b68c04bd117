//! Work directories for building a tree next to its final location.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Prepare an empty work directory named `name` under `parent_dir`,
/// removing leftovers from a previous run.
pub fn prepare_work_dir(parent_dir: &Path, name: &str) -> Result<PathBuf> {
    let work_dir = parent_dir.join(name);

    if work_dir.exists() {
        fs::remove_dir_all(&work_dir)
            .with_context(|| format!("Failed to remove stale {}", work_dir.display()))?;
    }
    fs::create_dir_all(&work_dir)
        .with_context(|| format!("Failed to create {}", work_dir.display()))?;

    Ok(work_dir)
}

/// Remove a work directory. Missing directories are fine.
pub fn cleanup_work_dir(path: &Path) {
    let _ = fs::remove_dir_all(path);
}

/// Replace `target` with the fully built `staged` tree.
///
/// Both must live on the same filesystem. The old tree is moved aside
/// first and removed only after the rename succeeded.
pub fn swap_into_place(staged: &Path, target: &Path) -> Result<()> {
    let backup = sibling(target, ".old");

    if target.exists() {
        if backup.exists() {
            fs::remove_dir_all(&backup)
                .with_context(|| format!("Failed to remove {}", backup.display()))?;
        }
        fs::rename(target, &backup)
            .with_context(|| format!("Failed to move {} aside", target.display()))?;
    }

    if let Err(e) = fs::rename(staged, target) {
        // Put the previous tree back so the target is never left missing.
        if backup.exists() {
            let _ = fs::rename(&backup, target);
        }
        return Err(e).with_context(|| {
            format!("Failed to move {} to {}", staged.display(), target.display())
        });
    }

    cleanup_work_dir(&backup);
    Ok(())
}

/// `target` with `suffix` appended to its final component.
pub fn sibling(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_work_dir_starts_empty() {
        let temp = TempDir::new().unwrap();
        let work = prepare_work_dir(temp.path(), "stage").unwrap();
        fs::write(work.join("leftover"), b"x").unwrap();

        let work = prepare_work_dir(temp.path(), "stage").unwrap();
        assert!(work.is_dir());
        assert_eq!(fs::read_dir(&work).unwrap().count(), 0);
    }

    #[test]
    fn test_swap_into_place_replaces_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("image");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("old"), b"old").unwrap();

        let staged = prepare_work_dir(temp.path(), "image.new").unwrap();
        fs::write(staged.join("new"), b"new").unwrap();

        swap_into_place(&staged, &target).unwrap();

        assert!(target.join("new").is_file());
        assert!(!target.join("old").exists());
        assert!(!staged.exists());
        assert!(!sibling(&target, ".old").exists());
    }

    #[test]
    fn test_swap_into_place_without_existing_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("image");
        let staged = prepare_work_dir(temp.path(), "image.new").unwrap();

        swap_into_place(&staged, &target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_sibling() {
        assert_eq!(
            sibling(Path::new("/srv/vnfs/rocky"), ".new"),
            PathBuf::from("/srv/vnfs/rocky.new")
        );
    }
}
