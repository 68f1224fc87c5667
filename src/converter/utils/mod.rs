//! Utility modules for conversion operations.

pub mod fs;
