//! Root filesystem checksums.
//!
//! Used to verify that a staged `rootfs` matches the bundle it was copied
//! from.

use crate::error::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Digests of a source tree and its staged copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeDigest {
    /// Digest of the bundle's rootfs.
    pub source: String,
    /// Digest of the build context's rootfs.
    pub staged: String,
}

impl TreeDigest {
    /// Whether both trees hashed to the same value.
    pub fn matches(&self) -> bool {
        self.source == self.staged
    }
}

/// Calculates SHA256 checksum of a directory tree.
///
/// Hashes each regular file's relative path and content in sorted path order,
/// so the result is independent of where the tree lives and of directory
/// iteration order. Every path is NUL terminated and every content is
/// prefixed with its length. Symlinks and special files are not followed.
///
/// A missing directory hashes like an empty one.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the tree
/// * `Err` - If a directory cannot be walked or a file cannot be read
pub async fn calculate_tree_sha256(dir_path: &Path) -> Result<String> {
    let root = dir_path.to_path_buf();
    let walked = tokio::task::spawn_blocking(move || -> std::io::Result<Vec<PathBuf>> {
        if !root.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&root).follow_links(false) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    })
    .await
    .map_err(|e| std::io::Error::other(format!("hashing task panicked: {e}")))
    .and_then(|files| files);
    let mut files = walked.fs_context("walking tree for hashing", dir_path)?;

    // Sort by path for deterministic ordering
    files.sort();

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    for path in files {
        if let Ok(rel_path) = path.strip_prefix(dir_path) {
            hasher.update(rel_path.to_string_lossy().as_bytes());
        }
        hasher.update([0u8]);

        let mut file = tokio::fs::File::open(&path)
            .await
            .fs_context("opening file for hashing", &path)?;
        let len = file
            .metadata()
            .await
            .fs_context("reading metadata for hashing", &path)?
            .len();
        hasher.update(len.to_be_bytes());

        loop {
            let n = file
                .read(&mut buffer)
                .await
                .fs_context("reading file for hash calculation", &path)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}
