//! Runtime spec extraction.
//!
//! Reads the small subset of an OCI runtime `config.json` needed to build an
//! image. Parsing is deliberately lenient: every field is optional and any
//! read or parse problem degrades to [`ExtractDefaults`] instead of failing.
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/main/config.md>

use super::bundle::{CONFIG_FILE, ROOTFS_DIR};
use super::dockerfile::{is_valid_env_key, is_valid_port};
use super::settings::ExtractDefaults;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Annotation carrying exposed ports, as produced by the OCI image-spec
/// conversion from an image config's `ExposedPorts`.
pub const EXPOSED_PORTS_ANNOTATION: &str = "org.opencontainers.image.exposedPorts";

/// Values needed to synthesize a Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Directory whose contents become the image filesystem.
    pub rootfs_path: PathBuf,

    /// Executable run as the container process. Never empty.
    pub entrypoint: String,

    /// Ports to expose, in declaration order. Empty means none.
    pub exposed_ports: Vec<String>,

    /// Arguments passed to the entrypoint.
    pub args: Vec<String>,

    /// Environment as `KEY=VALUE` entries.
    pub env: Vec<String>,

    /// Working directory of the process, if any.
    pub workdir: Option<String>,
}

impl ImageDescriptor {
    /// Descriptor carrying only the extractor defaults.
    pub fn with_defaults(bundle_path: &Path, defaults: &ExtractDefaults) -> Self {
        Self {
            rootfs_path: bundle_path.join(ROOTFS_DIR),
            entrypoint: defaults.entrypoint().to_string(),
            exposed_ports: defaults.exposed_ports.clone(),
            args: Vec::new(),
            env: Vec::new(),
            workdir: None,
        }
    }

    /// Copy of this descriptor whose rootfs points at the `rootfs` directory
    /// of a staged build context, relative to the context root.
    pub fn for_build_context(&self) -> Self {
        Self {
            rootfs_path: PathBuf::from(ROOTFS_DIR),
            ..self.clone()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RuntimeSpec {
    oci_version: Option<String>,
    process: Option<Process>,
    annotations: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Process {
    args: Vec<String>,
    env: Vec<String>,
    cwd: Option<String>,
}

/// Derives an [`ImageDescriptor`] from the bundle at `bundle_path`.
///
/// Never fails. A missing `config.json` is expected and logged at debug
/// level; an unreadable or malformed one is logged as a warning. In both
/// cases the fields fall back to `defaults`.
pub fn extract(bundle_path: &Path, defaults: &ExtractDefaults) -> ImageDescriptor {
    let mut descriptor = ImageDescriptor::with_defaults(bundle_path, defaults);

    let Some(spec) = read_spec(&bundle_path.join(CONFIG_FILE)) else {
        return descriptor;
    };

    if let Some(version) = &spec.oci_version {
        log::debug!("runtime spec version {}", version);
    }

    if let Some(process) = spec.process {
        let mut args = process.args.into_iter();
        match args.next() {
            Some(entrypoint) if !entrypoint.trim().is_empty() => {
                descriptor.entrypoint = entrypoint;
                descriptor.args = args.collect();
            }
            _ => log::debug!(
                "process.args has no entrypoint, using {}",
                descriptor.entrypoint
            ),
        }

        descriptor.env = process
            .env
            .into_iter()
            .filter(|entry| {
                let keep = is_embeddable_env(entry);
                if !keep {
                    log::warn!("ignoring malformed environment entry: {:?}", entry);
                }
                keep
            })
            .collect();

        descriptor.workdir = process.cwd.filter(|cwd| {
            if has_line_break(cwd) {
                log::warn!("ignoring working directory with a line break: {:?}", cwd);
                return false;
            }
            !cwd.is_empty() && cwd != "/"
        });
    }

    if let Some(raw) = spec.annotations.get(EXPOSED_PORTS_ANNOTATION) {
        let ports = parse_exposed_ports(raw);
        if !ports.is_empty() {
            descriptor.exposed_ports = ports;
        }
    }

    descriptor
}

fn read_spec(path: &Path) -> Option<RuntimeSpec> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no runtime spec at {}, using defaults", path.display());
            return None;
        }
        Err(e) => {
            log::warn!(
                "failed to read runtime spec {}: {}; using defaults",
                path.display(),
                e
            );
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(spec) => Some(spec),
        Err(e) => {
            log::warn!(
                "failed to parse runtime spec {}: {}; using defaults",
                path.display(),
                e
            );
            None
        }
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

fn is_embeddable_env(entry: &str) -> bool {
    entry
        .split_once('=')
        .is_some_and(|(key, value)| is_valid_env_key(key) && !has_line_break(value))
}

/// Splits a comma separated port list, dropping blanks, repeats and
/// specifiers that cannot be exposed. Protocols are lowercased.
fn parse_exposed_ports(raw: &str) -> Vec<String> {
    let mut ports: Vec<String> = Vec::new();
    for port in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let port = port.to_ascii_lowercase();
        if !is_valid_port(&port) {
            log::warn!("ignoring invalid exposed port: {:?}", port);
            continue;
        }
        if !ports.contains(&port) {
            ports.push(port);
        }
    }
    ports
}
