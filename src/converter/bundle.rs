//! OCI bundle handle.
//!
//! A bundle is a directory holding `config.json` and a `rootfs/` tree. Only
//! the bundle root is validated here; `rootfs` and `config.json` are read
//! leniently by later steps.

use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};

/// Standard runtime spec file name.
pub const CONFIG_FILE: &str = "config.json";

/// Root filesystem directory name.
pub const ROOTFS_DIR: &str = "rootfs";

/// Reference to an existing bundle directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciBundle {
    path: PathBuf,
}

impl OciBundle {
    /// Opens a bundle, failing with [`ConvertError::InputNotFound`] unless
    /// `path` is an existing directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => Ok(Self {
                path: path.to_path_buf(),
            }),
            Ok(_) => {
                log::debug!("bundle path is not a directory: {}", path.display());
                Err(ConvertError::InputNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                log::debug!("bundle path {} unavailable: {}", path.display(), e);
                Err(ConvertError::InputNotFound {
                    path: path.to_path_buf(),
                })
            }
        }
    }

    /// Bundle root as supplied by the caller.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the runtime spec file.
    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    /// Location of the root filesystem tree.
    pub fn rootfs_path(&self) -> PathBuf {
        self.path.join(ROOTFS_DIR)
    }
}
