//! OCI bundle to Docker build context converter
//!
//! This library turns an OCI runtime bundle (`config.json` + `rootfs/`) into:
//! - a generated `Dockerfile` (single stage, `FROM scratch`)
//! - a fresh build-context directory holding a copy of the rootfs
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;

// Re-export commonly used types
pub use converter::{Converter, Outcome};
pub use error::{CliError, ConvertError, Result};
