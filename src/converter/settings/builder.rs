//! Builder for constructing Settings.

use super::{CopyPolicy, ExtractDefaults, Settings, core::DEFAULT_MAINTAINER};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Every field is optional; unset fields fall back to built-in defaults when
/// [`build`](Self::build) is called. Later calls override earlier ones, which
/// is how the CLI layers its flags over a configuration file.
///
/// # Examples
///
/// ```
/// use oci2docker::converter::{ExtractDefaults, SettingsBuilder};
///
/// let settings = SettingsBuilder::new()
///     .maintainer("Jane Doe <jane@example.com>")
///     .defaults(ExtractDefaults {
///         entrypoint: "/usr/bin/app".into(),
///         exposed_ports: vec!["8080/tcp".into()],
///     })
///     .verify(true)
///     .build();
///
/// assert_eq!(settings.maintainer(), "Jane Doe <jane@example.com>");
/// assert!(settings.verify());
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    maintainer: Option<String>,
    temp_root: Option<PathBuf>,
    copy_policy: Option<CopyPolicy>,
    verify: Option<bool>,
    defaults: Option<ExtractDefaults>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the `MAINTAINER` text.
    ///
    /// Default: [`DEFAULT_MAINTAINER`]
    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = Some(maintainer.into());
        self
    }

    /// Sets the directory build contexts are created in.
    ///
    /// Default: [`std::env::temp_dir`]
    pub fn temp_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.temp_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the copy failure policy.
    ///
    /// Default: [`CopyPolicy::Lenient`]
    pub fn copy_policy(mut self, policy: CopyPolicy) -> Self {
        self.copy_policy = Some(policy);
        self
    }

    /// Enables digest verification of the staged rootfs.
    ///
    /// Default: false
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    /// Sets extractor fallbacks.
    ///
    /// Default: [`ExtractDefaults::default`]
    pub fn defaults(mut self, defaults: ExtractDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Overlays every field set in `other` onto this builder.
    pub fn merge(self, other: SettingsBuilder) -> Self {
        Self {
            maintainer: other.maintainer.or(self.maintainer),
            temp_root: other.temp_root.or(self.temp_root),
            copy_policy: other.copy_policy.or(self.copy_policy),
            verify: other.verify.or(self.verify),
            defaults: other.defaults.or(self.defaults),
        }
    }

    /// Builds the settings.
    pub fn build(self) -> Settings {
        Settings::new(
            self.maintainer
                .unwrap_or_else(|| DEFAULT_MAINTAINER.to_string()),
            self.temp_root.unwrap_or_else(std::env::temp_dir),
            self.copy_policy.unwrap_or_default(),
            self.verify.unwrap_or(false),
            self.defaults.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_use_defaults() {
        let settings = SettingsBuilder::new().build();

        assert_eq!(settings.maintainer(), DEFAULT_MAINTAINER);
        assert_eq!(settings.temp_root(), std::env::temp_dir());
        assert_eq!(settings.copy_policy(), CopyPolicy::Lenient);
        assert!(!settings.verify());
        assert_eq!(settings.defaults(), &ExtractDefaults::default());
    }

    #[test]
    fn merge_prefers_overlay_values() {
        let file = SettingsBuilder::new()
            .maintainer("from file")
            .temp_root("/var/tmp")
            .verify(true);
        let flags = SettingsBuilder::new()
            .maintainer("from flag")
            .copy_policy(CopyPolicy::Strict);

        let settings = file.merge(flags).build();

        assert_eq!(settings.maintainer(), "from flag");
        assert_eq!(settings.temp_root(), Path::new("/var/tmp"));
        assert!(settings.copy_policy().is_strict());
        assert!(settings.verify());
    }
}
