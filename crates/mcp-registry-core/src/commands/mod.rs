//! High-level commands for mcp-registry operations.
//!
//! Each command resolves its inputs against [`Settings`](crate::config::Settings)
//! and drives the core modules. The CLI is a thin layer over these.

pub mod build;
pub mod generate;
pub mod validate;

pub use build::{BuildCommand, BuildOptions};
pub use generate::{GenerateCommand, GenerateOptions, GenerateReport};
pub use validate::{ValidateCommand, ValidateOptions};
