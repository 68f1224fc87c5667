//! Configuration file loading.
//!
//! An optional TOML file supplies defaults for every conversion setting.
//! Values it leaves out keep their built-in defaults, and CLI flags override
//! it.

use crate::converter::{CopyPolicy, ExtractDefaults, SettingsBuilder};
use crate::error::{ConvertError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of an `oci2docker.toml` file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// `MAINTAINER` text.
    pub maintainer: Option<String>,

    /// Directory build contexts are created in.
    pub temp_dir: Option<PathBuf>,

    /// Abort on rootfs copy failures.
    pub strict: Option<bool>,

    /// Verify staged rootfs digests.
    pub verify: Option<bool>,

    /// Extractor fallbacks (`[defaults]` table).
    pub defaults: Option<ExtractDefaults>,
}

impl ConfigFile {
    /// Turns the file contents into a settings layer.
    pub fn into_builder(self) -> SettingsBuilder {
        let mut builder = SettingsBuilder::new();
        if let Some(maintainer) = self.maintainer {
            builder = builder.maintainer(maintainer);
        }
        if let Some(temp_dir) = self.temp_dir {
            builder = builder.temp_root(temp_dir);
        }
        if let Some(strict) = self.strict {
            builder = builder.copy_policy(if strict {
                CopyPolicy::Strict
            } else {
                CopyPolicy::Lenient
            });
        }
        if let Some(verify) = self.verify {
            builder = builder.verify(verify);
        }
        if let Some(defaults) = self.defaults {
            builder = builder.defaults(defaults);
        }
        builder
    }
}

/// Reads and parses a configuration file.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| ConvertError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to read: {e}"),
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| ConvertError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to parse: {e}"),
    })?;

    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}
