//! Configuration management
//!
//! Settings are layered: built-in defaults, then the global
//! `config.toml`, then the project's `mcp-registry.toml`. Command-line flags
//! are applied on top by the caller. API keys are never read from these files.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

use std::path::PathBuf;

pub use parser::{parse_config_file, parse_config_str};
pub use schema::{ConfigFile, GeneratorSection, HostsSection, RegistrySection, ValidationSection};
pub use store::ConfigStore;

use crate::llm::anthropic::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use crate::source::HostEndpoints;
use crate::spec::{ApiCredentialRule, SpecValidator};

/// Where generated specs land and where the registry reads them from
pub const DEFAULT_SPEC_DIR: &str = "mcp-servers";
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub generator: GeneratorSettings,
    pub registry: RegistrySettings,
    pub validation: ValidationSettings,
    pub hosts: HostEndpoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub output_dir: PathBuf,
    pub api_base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySettings {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSettings {
    pub api_terms: Vec<String>,
    pub require_api_env_vars: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

impl Settings {
    /// Fill every unset value in `file` with its built-in default
    pub fn from_file(file: ConfigFile) -> Self {
        let ConfigFile {
            generator,
            registry,
            validation,
            hosts,
        } = file;
        let default_hosts = HostEndpoints::default();

        Self {
            generator: GeneratorSettings {
                model: generator.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature: generator.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                max_tokens: generator.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                output_dir: generator
                    .output_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SPEC_DIR)),
                api_base_url: generator
                    .api_base_url
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            },
            registry: RegistrySettings {
                source_dir: registry
                    .source_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SPEC_DIR)),
                build_dir: registry
                    .build_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR)),
            },
            validation: ValidationSettings {
                api_terms: validation.api_terms.unwrap_or_else(|| {
                    ApiCredentialRule::DEFAULT_TERMS
                        .iter()
                        .map(|t| t.to_string())
                        .collect()
                }),
                require_api_env_vars: validation.require_api_env_vars.unwrap_or(true),
            },
            hosts: HostEndpoints {
                github_raw: hosts.github_raw.unwrap_or(default_hosts.github_raw),
                gitlab: hosts.gitlab.unwrap_or(default_hosts.gitlab),
            },
        }
    }

    /// Credential rule built from `[validation]`, if enabled
    pub fn api_rule(&self) -> Option<ApiCredentialRule> {
        self.validation
            .require_api_env_vars
            .then(|| ApiCredentialRule::new(&self.validation.api_terms))
    }

    /// Strict schema validator honoring `[validation]`
    pub fn spec_validator(&self) -> SpecValidator {
        SpecValidator::strict().with_api_rule(self.api_rule())
    }
}
