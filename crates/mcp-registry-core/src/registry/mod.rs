//! Static server registry
//!
//! Discovers definition files under a source directory, validates them and
//! merges them into the published `repository.json`.

pub mod builder;
pub mod definition;
pub mod validator;

pub use builder::{BuildError, BuildReport, REPOSITORY_FILE, RegistryBuilder};
pub use definition::DefinitionFile;
pub use validator::{FileReport, Issue, RegistryValidator, Severity, ValidationReport};
