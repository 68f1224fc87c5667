//! File system utilities for staging.
//!
//! Provides the recursive tree copy used to populate a build context, with
//! mode and symlink preservation and per-entry failure reporting.

use crate::converter::settings::CopyPolicy;
use crate::error::{ConvertError, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// A single entry that could not be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFailure {
    /// Source path of the entry.
    pub path: PathBuf,
    /// What went wrong.
    pub reason: String,
}

impl std::fmt::Display for CopyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Outcome of a recursive copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Regular files copied.
    pub files: usize,
    /// Directories created below the destination root.
    pub directories: usize,
    /// Symlinks recreated.
    pub symlinks: usize,
    /// Devices, fifos and sockets that were not copied.
    pub skipped: Vec<PathBuf>,
    /// Entries that failed to copy.
    pub failures: Vec<CopyFailure>,
}

impl CopyReport {
    /// Whether every entry was copied.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Creates `path` with the given unix mode. Fails if it already exists.
pub async fn create_dir_with_mode(path: &Path, mode: u32) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(mode);
    builder
        .create(path)
        .await
        .fs_context("creating directory", path)?;

    // DirBuilder's mode is filtered by the umask.
    set_mode(path, mode).await
}

/// Writes `contents` to a new file at `path` with the given unix mode.
pub async fn write_file_with_mode(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    fs::write(path, contents)
        .await
        .fs_context("writing file", path)?;
    set_mode(path, mode).await
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .fs_context("setting permissions", path)
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Makes a symbolic link.
#[cfg(unix)]
fn symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Makes a symbolic link.
#[cfg(windows)]
fn symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    if target_is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Recursively copies the contents of `from` into the existing directory `to`.
///
/// Regular files keep their permissions, directories are recreated with the
/// source modes and symlinks are recreated verbatim (never followed). Other
/// file types are skipped and listed in the report.
///
/// Directory modes are applied after the walk, deepest first, so read-only
/// source directories do not block copying their children.
///
/// With [`CopyPolicy::Lenient`] every failure, including a missing `from`,
/// is logged and recorded while the copy carries on. With
/// [`CopyPolicy::Strict`] the first failure is returned as an error.
pub async fn copy_tree(from: &Path, to: &Path, policy: CopyPolicy) -> Result<CopyReport> {
    let source = from.to_path_buf();
    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || copy_tree_blocking(&from, &to, policy))
        .await
        .map_err(|e| ConvertError::Filesystem {
            operation: "copying tree".to_string(),
            path: source,
            source: io::Error::other(format!("copy task panicked: {e}")),
        })?
}

fn copy_tree_blocking(from: &Path, to: &Path, policy: CopyPolicy) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    let mut dir_modes: Vec<(PathBuf, std::fs::Permissions)> = Vec::new();

    let record = |report: &mut CopyReport, path: &Path, operation: &str, err: io::Error| {
        if policy.is_strict() {
            return Err(ConvertError::Filesystem {
                operation: operation.to_string(),
                path: path.to_path_buf(),
                source: err,
            });
        }
        log::warn!("failed {} {}: {}", operation, path.display(), err);
        report.failures.push(CopyFailure {
            path: path.to_path_buf(),
            reason: format!("{operation}: {err}"),
        });
        Ok(())
    };

    if !from.is_dir() {
        let err = io::Error::new(io::ErrorKind::NotFound, "source is not a directory");
        record(&mut report, from, "reading source tree", err)?;
        return Ok(report);
    }

    for entry in walkdir::WalkDir::new(from).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(from).to_path_buf();
                record(&mut report, &path, "reading source tree", e.into())?;
                continue;
            }
        };

        // The walk only yields paths below `from`.
        let Ok(rel_path) = entry.path().strip_prefix(from) else {
            continue;
        };
        let dest_path = to.join(rel_path);
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            let result = std::fs::read_link(entry.path())
                .and_then(|target| symlink(&target, &dest_path, entry.path().is_dir()));
            match result {
                Ok(()) => report.symlinks += 1,
                Err(e) => record(&mut report, entry.path(), "copying symlink", e)?,
            }
        } else if file_type.is_dir() {
            if entry.depth() == 0 {
                // Destination root already exists and keeps its own mode.
                continue;
            }
            let result = std::fs::create_dir(&dest_path)
                .and_then(|()| entry.metadata().map_err(io::Error::from));
            match result {
                Ok(metadata) => {
                    report.directories += 1;
                    dir_modes.push((dest_path, metadata.permissions()));
                }
                Err(e) => record(&mut report, entry.path(), "creating directory", e)?,
            }
        } else if file_type.is_file() {
            match std::fs::copy(entry.path(), &dest_path) {
                Ok(_) => report.files += 1,
                Err(e) => record(&mut report, entry.path(), "copying file", e)?,
            }
        } else {
            log::warn!("skipping special file {}", entry.path().display());
            report.skipped.push(entry.path().to_path_buf());
        }
    }

    for (dir, permissions) in dir_modes.into_iter().rev() {
        if let Err(e) = std::fs::set_permissions(&dir, permissions) {
            record(&mut report, &dir, "setting permissions", e)?;
        }
    }

    Ok(report)
}
