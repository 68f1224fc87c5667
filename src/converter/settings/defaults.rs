//! Fallback values used when a bundle's runtime spec leaves fields unset.

use serde::Deserialize;

/// Entrypoint used when `process.args` is missing or empty.
pub const DEFAULT_ENTRYPOINT: &str = "/bin/sh";

/// Values the spec extractor falls back to.
///
/// Falling back is policy, not error suppression: a bundle without a
/// `config.json`, or with one that does not declare a process, still
/// converts into an image running [`DEFAULT_ENTRYPOINT`].
///
/// # Examples
///
/// ```
/// use oci2docker::converter::ExtractDefaults;
///
/// let defaults = ExtractDefaults::default();
/// assert_eq!(defaults.entrypoint, "/bin/sh");
/// assert!(defaults.exposed_ports.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractDefaults {
    /// Executable run as the container process.
    ///
    /// Default: `/bin/sh`
    pub entrypoint: String,

    /// Ports exposed when the bundle declares none.
    ///
    /// Default: empty (expose nothing)
    pub exposed_ports: Vec<String>,
}

impl Default for ExtractDefaults {
    fn default() -> Self {
        Self {
            entrypoint: DEFAULT_ENTRYPOINT.to_string(),
            exposed_ports: Vec::new(),
        }
    }
}

impl ExtractDefaults {
    /// Entrypoint to fall back to, never empty.
    ///
    /// A blank configured entrypoint would break the "never empty" guarantee
    /// of the descriptor, so it resolves to [`DEFAULT_ENTRYPOINT`] as well.
    pub fn entrypoint(&self) -> &str {
        if self.entrypoint.trim().is_empty() {
            DEFAULT_ENTRYPOINT
        } else {
            &self.entrypoint
        }
    }
}
