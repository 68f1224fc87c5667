//! Conversion orchestration.
//!
//! The [`Converter`] runs a bundle through four steps:
//! 1. Validates the bundle directory
//! 2. Extracts an [`ImageDescriptor`](crate::converter::ImageDescriptor) from `config.json`
//! 3. Renders the Dockerfile
//! 4. Stages the build context
//!
//! - [`checksum`] - SHA256 digests for verifying the staged rootfs
//! - `orchestrator` - [`Converter`] and its result types

pub mod checksum;
mod orchestrator;

pub use orchestrator::{ConversionReport, Converter, Outcome, Stage};
