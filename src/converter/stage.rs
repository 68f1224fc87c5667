//! Build context staging.
//!
//! A build context is a fresh directory holding a `Dockerfile` and a copy of
//! the bundle's `rootfs`. It is created under the configured temp root with a
//! uuid-based name, never reused, and never removed by this crate: once
//! [`Stager::stage`] returns, the directory belongs to the caller.

use super::builder::checksum::{TreeDigest, calculate_tree_sha256};
use super::bundle::{OciBundle, ROOTFS_DIR};
use super::settings::{CopyPolicy, Settings};
use super::utils::fs::{CopyReport, copy_tree, create_dir_with_mode, write_file_with_mode};
use crate::error::{ConvertError, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// File name of the generated recipe inside a build context.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Prefix of build context directory names.
pub const CONTEXT_PREFIX: &str = "oci2docker";

const ROOTFS_MODE: u32 = 0o755;
const DOCKERFILE_MODE: u32 = 0o644;

/// A staged, self-contained build context.
#[derive(Debug, Clone)]
pub struct BuildContext {
    root: PathBuf,
    copy: CopyReport,
    digest: Option<TreeDigest>,
    unverified: Option<String>,
}

impl BuildContext {
    /// Context root, suitable as the `docker build` path argument.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Location of the generated Dockerfile.
    pub fn dockerfile_path(&self) -> PathBuf {
        self.root.join(DOCKERFILE_NAME)
    }

    /// Location of the copied root filesystem.
    pub fn rootfs_path(&self) -> PathBuf {
        self.root.join(ROOTFS_DIR)
    }

    /// What the rootfs copy did.
    pub fn copy_report(&self) -> &CopyReport {
        &self.copy
    }

    /// Source and staged digests, when verification was requested.
    pub fn digest(&self) -> Option<&TreeDigest> {
        self.digest.as_ref()
    }

    /// Why verification could not run, when it was requested but a tree
    /// could not be hashed under [`CopyPolicy::Lenient`].
    pub fn verification_error(&self) -> Option<&str> {
        self.unverified.as_deref()
    }
}

/// Creates build contexts.
#[derive(Debug, Clone)]
pub struct Stager {
    temp_root: PathBuf,
    copy_policy: CopyPolicy,
    verify: bool,
}

impl Stager {
    /// Creates a stager from conversion settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            temp_root: settings.temp_root().to_path_buf(),
            copy_policy: settings.copy_policy(),
            verify: settings.verify(),
        }
    }

    /// Stages `dockerfile` and a copy of the bundle's rootfs into a new
    /// build context.
    ///
    /// Directory creation and the Dockerfile write always abort on failure.
    /// Copy failures follow the configured [`CopyPolicy`]. A failed run leaves
    /// its partial context on disk.
    pub async fn stage(&self, bundle: &OciBundle, dockerfile: &str) -> Result<BuildContext> {
        // 1. Fresh context root
        tokio::fs::create_dir_all(&self.temp_root)
            .await
            .fs_context("creating temp root", &self.temp_root)?;

        let root = self
            .temp_root
            .join(format!("{}-{}", CONTEXT_PREFIX, uuid::Uuid::new_v4()));
        tokio::fs::create_dir(&root)
            .await
            .fs_context("creating build context", &root)?;
        log::debug!("created build context {}", root.display());

        // 2. rootfs destination
        let rootfs = root.join(ROOTFS_DIR);
        create_dir_with_mode(&rootfs, ROOTFS_MODE).await?;

        // 3. Dockerfile, written in place
        let dockerfile_path = root.join(DOCKERFILE_NAME);
        write_file_with_mode(&dockerfile_path, dockerfile.as_bytes(), DOCKERFILE_MODE).await?;

        // 4. rootfs contents
        let source = bundle.rootfs_path();
        log::debug!("copying {} to {}", source.display(), rootfs.display());
        let copy = copy_tree(&source, &rootfs, self.copy_policy).await?;
        log::debug!(
            "copied {} files, {} directories, {} symlinks",
            copy.files,
            copy.directories,
            copy.symlinks
        );

        let mut context = BuildContext {
            root,
            copy,
            digest: None,
            unverified: None,
        };
        if self.verify {
            match self.verify_copy(&source, &rootfs).await {
                Ok(digest) => context.digest = Some(digest),
                Err(e) if !self.copy_policy.is_strict() => {
                    log::warn!("could not verify rootfs copy: {}", e);
                    context.unverified = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(context)
    }

    async fn verify_copy(&self, source: &Path, staged: &Path) -> Result<TreeDigest> {
        let digest = TreeDigest {
            source: calculate_tree_sha256(source).await?,
            staged: calculate_tree_sha256(staged).await?,
        };

        if !digest.matches() {
            if self.copy_policy.is_strict() {
                return Err(ConvertError::Filesystem {
                    operation: "verifying rootfs copy".to_string(),
                    path: staged.to_path_buf(),
                    source: std::io::Error::other(format!(
                        "digest {} does not match source digest {}",
                        digest.staged, digest.source
                    )),
                });
            }
            log::warn!(
                "staged rootfs digest {} differs from source {}",
                digest.staged,
                digest.source
            );
        }

        Ok(digest)
    }
}
