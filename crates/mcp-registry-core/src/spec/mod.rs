//! MCP server package specifications
//!
//! Schema types, fail-fast validation and output path derivation for the
//! per-server definition files stored in the registry.

pub mod output;
pub mod types;
pub mod validation;

pub use output::{determine_output_path, save_to_file};
pub use types::{
    DockerInstallation, EnvironmentVariables, InstallationMethods, InstallationMethodsDraft,
    MethodDraft, MethodKind, NodeModuleInstallation, PackageSpec, PackageSpecDraft,
    PythonModuleInstallation, is_provided,
};
pub use validation::{ApiCredentialRule, SpecError, SpecValidator};
