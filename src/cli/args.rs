//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and the layering of
//! configuration file values under command line flags.

use crate::config::load_config;
use crate::converter::{CopyPolicy, Settings, SettingsBuilder};
use crate::error::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Converts OCI runtime bundles into Docker build contexts
#[derive(Parser, Debug)]
#[command(
    name = "oci2docker",
    version,
    about = "A tool for converting OCI bundles to Docker images",
    long_about = "Converts an OCI runtime bundle (config.json + rootfs/) into a Docker build context.

The build context is a new directory under the temp root containing a generated
Dockerfile and a copy of the bundle's rootfs. It is never removed automatically.

Usage:
  oci2docker convert --oci-bundle ./bundle
  oci2docker convert --oci-bundle /bundles/app --strict --verify
  oci2docker convert --config oci2docker.toml --temp-dir /var/tmp"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an OCI bundle into a Docker build context
    Convert(ConvertArgs),
}

/// Arguments of the `convert` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Path of the OCI bundle to convert
    #[arg(long = "oci-bundle", value_name = "PATH", default_value = ".")]
    pub oci_bundle: PathBuf,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "OCI2DOCKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to create the build context in (default: system temp dir)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Text of the Dockerfile MAINTAINER instruction
    #[arg(long, value_name = "TEXT")]
    pub maintainer: Option<String>,

    /// Abort when any part of the rootfs cannot be copied
    #[arg(long)]
    pub strict: bool,

    /// Compare SHA-256 digests of the source and staged rootfs
    #[arg(long)]
    pub verify: bool,

    /// Only print the build context path
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also print copy statistics and the Dockerfile location
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Renders the help text of a subcommand.
    pub fn subcommand_help(name: &str) -> String {
        let mut command = Self::command();
        command.build();
        command
            .find_subcommand_mut(name)
            .map(|sub| sub.render_help().to_string())
            .unwrap_or_default()
    }
}

impl ConvertArgs {
    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.oci_bundle.as_os_str().is_empty() {
            return Err("OCI bundle path cannot be empty".to_string());
        }
        if self
            .maintainer
            .as_deref()
            .is_some_and(|m| m.trim().is_empty())
        {
            return Err("Maintainer cannot be empty".to_string());
        }
        Ok(())
    }

    /// Builds conversion settings: defaults, then the configuration file,
    /// then flags.
    pub fn settings(&self) -> Result<Settings> {
        let base = match &self.config {
            Some(path) => load_config(path)?.into_builder(),
            None => SettingsBuilder::new(),
        };

        let mut flags = SettingsBuilder::new();
        if let Some(maintainer) = &self.maintainer {
            flags = flags.maintainer(maintainer.clone());
        }
        if let Some(temp_dir) = &self.temp_dir {
            flags = flags.temp_root(temp_dir);
        }
        if self.strict {
            flags = flags.copy_policy(CopyPolicy::Strict);
        }
        if self.verify {
            flags = flags.verify(true);
        }

        Ok(base.merge(flags).build())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&ConvertArgs> for RuntimeConfig {
    fn from(args: &ConvertArgs) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
