//! Core Settings struct and implementations.

use super::ExtractDefaults;
use std::path::{Path, PathBuf};

/// Maintainer written to the generated Dockerfile unless overridden.
pub const DEFAULT_MAINTAINER: &str = "oci2docker <oci2docker@users.noreply.github.com>";

/// How the stager reacts to failures while copying the root filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Record each failure as a warning and keep copying.
    #[default]
    Lenient,
    /// Abort the run on the first failure.
    Strict,
}

impl CopyPolicy {
    /// Whether copy failures abort the run.
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Settings for conversion runs.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which layers
/// configuration-file values and CLI overrides over built-in defaults.
///
/// # Examples
///
/// ```
/// use oci2docker::converter::{CopyPolicy, SettingsBuilder};
///
/// let settings = SettingsBuilder::new()
///     .temp_root("/var/tmp")
///     .copy_policy(CopyPolicy::Strict)
///     .build();
///
/// assert!(settings.copy_policy().is_strict());
/// assert_eq!(settings.defaults().entrypoint(), "/bin/sh");
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Text of the `MAINTAINER` instruction.
    maintainer: String,

    /// Directory under which build contexts are created.
    ///
    /// Typically the system temp directory.
    temp_root: PathBuf,

    /// Copy failure handling.
    copy_policy: CopyPolicy,

    /// Compare source and staged rootfs digests after copying.
    verify: bool,

    /// Extractor fallbacks.
    defaults: ExtractDefaults,
}

impl Settings {
    pub(super) fn new(
        maintainer: String,
        temp_root: PathBuf,
        copy_policy: CopyPolicy,
        verify: bool,
        defaults: ExtractDefaults,
    ) -> Self {
        Self {
            maintainer,
            temp_root,
            copy_policy,
            verify,
            defaults,
        }
    }

    /// Returns the Dockerfile maintainer.
    pub fn maintainer(&self) -> &str {
        &self.maintainer
    }

    /// Returns the directory build contexts are created in.
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Returns the copy failure policy.
    pub fn copy_policy(&self) -> CopyPolicy {
        self.copy_policy
    }

    /// Returns whether staged trees are verified against their source.
    pub fn verify(&self) -> bool {
        self.verify
    }

    /// Returns the extractor fallbacks.
    pub fn defaults(&self) -> &ExtractDefaults {
        &self.defaults
    }
}

impl Default for Settings {
    fn default() -> Self {
        super::SettingsBuilder::new().build()
    }
}
