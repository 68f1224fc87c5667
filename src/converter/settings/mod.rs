//! Configuration structures for conversion runs.
//!
//! [`Settings`] is assembled through [`SettingsBuilder`]; [`ExtractDefaults`]
//! holds the fallbacks the spec extractor applies.

mod builder;
mod core;
mod defaults;

pub use builder::SettingsBuilder;
pub use core::{CopyPolicy, DEFAULT_MAINTAINER, Settings};
pub use defaults::{DEFAULT_ENTRYPOINT, ExtractDefaults};
