//! OCI bundle to Docker build context conversion.
//!
//! # Overview
//!
//! A conversion:
//! 1. Opens the [`OciBundle`] (a missing path asks for usage help instead)
//! 2. Extracts an [`ImageDescriptor`] with [`spec::extract`]
//! 3. Renders a Dockerfile with [`DockerfileRenderer`]
//! 4. Stages a [`BuildContext`] with [`Stager`]
//!
//! # Example
//!
//! ```no_run
//! use oci2docker::converter::{Converter, Outcome, SettingsBuilder};
//!
//! # async fn example() -> oci2docker::Result<()> {
//! let settings = SettingsBuilder::new().verify(true).build();
//! let converter = Converter::new(settings)?;
//!
//! if let Outcome::Converted(report) = converter.convert("./bundle").await? {
//!     println!("{}", report.build_context.path().display());
//!     for warning in &report.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod bundle;
pub mod dockerfile;
pub mod settings;
pub mod spec;
pub mod stage;
pub mod utils;

pub use builder::{ConversionReport, Converter, Outcome, Stage};
pub use bundle::OciBundle;
pub use dockerfile::DockerfileRenderer;
pub use settings::{CopyPolicy, ExtractDefaults, Settings, SettingsBuilder};
pub use spec::ImageDescriptor;
pub use stage::{BuildContext, Stager};
