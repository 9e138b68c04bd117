//! Small file helpers: line reads and checksums.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Read a text file into its lines, without line terminators.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// SHA256 of a file's content as lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to hash {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("exports");
        fs::write(&path, "/home\n/opt\r\n\n/srv").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["/home", "/opt", "", "/srv"]);
    }

    #[test]
    fn test_sha256_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        fs::write(&path, b"").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let missing = Path::new("/nonexistent_path_12345");
        assert!(read_lines(missing).is_err());
        assert!(sha256_file(missing).is_err());
    }
}
