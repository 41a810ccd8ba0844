//! mcp-registry core library
//!
//! Generates validated package specifications for MCP servers from their
//! repository URLs and builds the static registry those specs are published in.

pub mod commands;
pub mod config;
pub mod generator;
pub mod llm;
pub mod registry;
pub mod source;
pub mod spec;

/// Re-exports of commonly used types
pub mod prelude {
    // Commands
    pub use crate::commands::{
        BuildCommand, BuildOptions, GenerateCommand, GenerateOptions, GenerateReport,
        ValidateCommand, ValidateOptions,
    };

    // Configuration
    pub use crate::config::{ConfigStore, Settings};

    // Generation
    pub use crate::generator::{GenerateError, SpecGenerator};
    pub use crate::llm::{AnthropicClient, AnthropicOptions, CompletionClient, CompletionError};
    pub use crate::source::{HostEndpoints, RawContentFetcher};

    // Specs
    pub use crate::spec::{
        InstallationMethods, PackageSpec, SpecError, SpecValidator, determine_output_path,
        save_to_file,
    };

    // Registry
    pub use crate::registry::{
        BuildError, BuildReport, RegistryBuilder, RegistryValidator, ValidationReport,
    };
}
