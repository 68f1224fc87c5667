//! Dockerfile rendering.
//!
//! Turns an [`ImageDescriptor`] into Dockerfile text using Handlebars. Every
//! value is validated and escaped here, so a descriptor either renders into a
//! well-formed Dockerfile or fails with [`ConvertError::Template`] before
//! anything touches the filesystem.

use super::template::DOCKERFILE_TEMPLATE;
use crate::converter::spec::ImageDescriptor;
use crate::error::{ConvertError, Result};
use handlebars::Handlebars;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

const TEMPLATE_NAME: &str = "Dockerfile";

/// `<port>[-<port>][/<proto>]`, e.g. `80`, `8080/tcp`, `6000-6005/udp`.
static PORT_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,5})(?:-(\d{1,5}))?(?:/(?:tcp|udp|sctp))?$")
        .expect("port pattern is valid")
});

#[derive(Serialize)]
struct TemplateData<'a> {
    maintainer: &'a str,
    workdir: &'a str,
    env: Vec<String>,
    entrypoint: String,
    cmd: String,
    add: String,
    expose: String,
}

/// Renders Dockerfiles from a fixed template.
#[derive(Debug)]
pub struct DockerfileRenderer {
    handlebars: Handlebars<'static>,
    maintainer: String,
}

impl DockerfileRenderer {
    /// Creates a renderer writing `maintainer` into every `MAINTAINER` line.
    pub fn new(maintainer: impl Into<String>) -> Result<Self> {
        let maintainer = maintainer.into();
        reject_line_breaks("maintainer", &maintainer)?;

        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string(TEMPLATE_NAME, DOCKERFILE_TEMPLATE)
            .map_err(|e| {
                ConvertError::template(format!("failed to register Dockerfile template: {e}"))
            })?;

        Ok(Self {
            handlebars,
            maintainer,
        })
    }

    /// Renders `descriptor` into Dockerfile text.
    ///
    /// Deterministic: the same descriptor always produces byte-identical
    /// output. No filesystem access.
    pub fn render(&self, descriptor: &ImageDescriptor) -> Result<String> {
        let data = TemplateData {
            maintainer: &self.maintainer,
            workdir: workdir(descriptor)?,
            env: descriptor
                .env
                .iter()
                .map(String::as_str)
                .map(env_instruction)
                .collect::<Result<_>>()?,
            entrypoint: entrypoint(&descriptor.entrypoint)?,
            cmd: json_array(descriptor.args.as_slice())?,
            add: add_source(descriptor)?,
            expose: expose(&descriptor.exposed_ports)?,
        };

        self.handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| ConvertError::template(format!("failed to render Dockerfile: {e}")))
    }
}

fn reject_line_breaks(field: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(ConvertError::template(format!(
            "{field} contains a line break: {value:?}"
        )));
    }
    Ok(())
}

fn workdir(descriptor: &ImageDescriptor) -> Result<&str> {
    let workdir = descriptor.workdir.as_deref().unwrap_or_default();
    reject_line_breaks("working directory", workdir)?;
    Ok(workdir)
}

fn entrypoint(entrypoint: &str) -> Result<String> {
    if entrypoint.trim().is_empty() {
        return Err(ConvertError::template("entrypoint is empty"));
    }
    json_array(&[entrypoint])
}

/// JSON exec form; an empty list renders as an empty string.
fn json_array<S: AsRef<str> + Serialize>(items: &[S]) -> Result<String> {
    if items.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(items)
        .map_err(|e| ConvertError::template(format!("failed to quote {} values: {e}", items.len())))
}

fn add_source(descriptor: &ImageDescriptor) -> Result<String> {
    let path = descriptor.rootfs_path.to_str().ok_or_else(|| {
        ConvertError::template(format!(
            "rootfs path is not valid UTF-8: {}",
            descriptor.rootfs_path.display()
        ))
    })?;
    reject_line_breaks("rootfs path", path)?;

    if path.chars().any(char::is_whitespace) {
        json_array(&[path, "."])
    } else {
        Ok(format!("{path} ."))
    }
}

fn env_instruction(entry: &str) -> Result<String> {
    let (key, value) = entry.split_once('=').ok_or_else(|| {
        ConvertError::template(format!("environment entry has no '=': {entry:?}"))
    })?;
    if !is_valid_env_key(key) {
        return Err(ConvertError::template(format!(
            "invalid environment variable name: {key:?}"
        )));
    }
    reject_line_breaks("environment value", value)?;

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');

    Ok(format!("{key}={quoted}"))
}

/// Whether `key` can be written as the name of an `ENV` instruction.
pub fn is_valid_env_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}

/// Whether `spec` is an `EXPOSE` port specifier: `<port>[-<port>][/<proto>]`
/// with lowercase protocol and ports in 1..=65535.
pub fn is_valid_port(spec: &str) -> bool {
    validate_port(spec).is_ok()
}

fn expose(ports: &[String]) -> Result<String> {
    for port in ports {
        validate_port(port)?;
    }
    Ok(ports.join(" "))
}

fn validate_port(spec: &str) -> Result<()> {
    let invalid = || ConvertError::template(format!("invalid port specifier: {spec:?}"));

    let caps = PORT_SPEC.captures(spec).ok_or_else(invalid)?;
    let start: u32 = caps[1].parse().map_err(|_| invalid())?;
    let end: u32 = match caps.get(2) {
        Some(end) => end.as_str().parse().map_err(|_| invalid())?,
        None => start,
    };

    if start == 0 || end > 65535 || start > end {
        return Err(invalid());
    }
    Ok(())
}
