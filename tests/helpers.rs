//! Shared test utilities for vnfsctl tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Longer than the kernel's coarse ctime granularity.
pub const CTIME_TICK: Duration = Duration::from_millis(50);

/// Test environment with a source chroot and an artifact location.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Source tree (the chroot a VNFS is generated from)
    pub chroot: PathBuf,
    /// Generated tree location (not created)
    pub vnfs: PathBuf,
    pub base_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        let chroot = base_dir.join("chroots/rocky");
        let vnfs = base_dir.join("vnfs/rocky");

        fs::create_dir_all(&chroot).expect("Failed to create chroot dir");
        fs::create_dir_all(base_dir.join("vnfs")).expect("Failed to create vnfs dir");

        Self {
            _temp_dir: temp_dir,
            chroot,
            vnfs,
            base_dir,
        }
    }
}

/// Populate a small node chroot: nested dirs, text files, an empty file,
/// an executable, and a private directory.
pub fn create_mock_chroot(root: &Path) {
    for dir in ["etc/sysconfig", "usr/bin", "var/empty", "root"] {
        fs::create_dir_all(root.join(dir)).expect("Failed to create mock chroot dir");
    }

    fs::write(root.join("etc/hostname"), "n0001\n").expect("Failed to write hostname");
    fs::write(
        root.join("etc/fstab"),
        "warewulf:/home /home nfs defaults 0 0\n",
    )
    .expect("Failed to write fstab");
    fs::write(root.join("etc/sysconfig/network"), "").expect("Failed to write empty file");

    let init = root.join("usr/bin/wwinit");
    fs::write(&init, "#!/bin/sh\nexec /sbin/init\n").expect("Failed to write wwinit");
    fs::set_permissions(&init, fs::Permissions::from_mode(0o755)).expect("Failed to chmod");

    fs::set_permissions(root.join("root"), fs::Permissions::from_mode(0o700))
        .expect("Failed to chmod root dir");
}

/// Bump the status-change time of `path` without touching its content.
pub fn touch_metadata(path: &Path) {
    thread::sleep(CTIME_TICK);
    let mode = fs::metadata(path)
        .expect("Failed to stat")
        .permissions()
        .mode();
    fs::set_permissions(path, fs::Permissions::from_mode(mode ^ 0o001))
        .expect("Failed to chmod");
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .expect("Failed to chmod");
}

/// Assert that the trees at `a` and `b` have the same entries, types and
/// file contents.
pub fn assert_trees_match(a: &Path, b: &Path) {
    for entry in walkdir::WalkDir::new(a) {
        let entry = entry.expect("Failed to walk source tree");
        let rel = entry.path().strip_prefix(a).unwrap();
        let other = b.join(rel);

        if entry.file_type().is_dir() {
            assert!(other.is_dir(), "Expected directory at {}", other.display());
        } else {
            assert!(other.is_file(), "Expected file at {}", other.display());
            assert_eq!(
                fs::read(entry.path()).unwrap(),
                fs::read(&other).unwrap(),
                "Content differs for {}",
                rel.display()
            );
        }
    }
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to read file: {}", path.display()));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}

/// Running as root allows chown to arbitrary ids.
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
