//! Configuration file schema for mcp-registry.toml

use std::path::PathBuf;

use serde::Deserialize;

/// Contents of one configuration file
///
/// Every field is optional so layers can be merged; unset values fall
/// through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generator: GeneratorSection,

    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub validation: ValidationSection,

    #[serde(default)]
    pub hosts: HostsSection,
}

/// `[generator]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratorSection {
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub api_base_url: Option<String>,
}

/// `[registry]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistrySection {
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    #[serde(default)]
    pub build_dir: Option<PathBuf>,
}

/// `[validation]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationSection {
    /// Name/description terms that mark a server as needing credentials
    #[serde(default)]
    pub api_terms: Option<Vec<String>>,

    /// Turn the credential rule off entirely when false
    #[serde(default)]
    pub require_api_env_vars: Option<bool>,
}

/// `[hosts]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostsSection {
    #[serde(default)]
    pub github_raw: Option<String>,

    #[serde(default)]
    pub gitlab: Option<String>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another layer into this one; values set in `other` win
    pub fn merge(&mut self, other: ConfigFile) {
        let ConfigFile {
            generator,
            registry,
            validation,
            hosts,
        } = other;

        overlay(&mut self.generator.model, generator.model);
        overlay(&mut self.generator.temperature, generator.temperature);
        overlay(&mut self.generator.max_tokens, generator.max_tokens);
        overlay(&mut self.generator.output_dir, generator.output_dir);
        overlay(&mut self.generator.api_base_url, generator.api_base_url);

        overlay(&mut self.registry.source_dir, registry.source_dir);
        overlay(&mut self.registry.build_dir, registry.build_dir);

        overlay(&mut self.validation.api_terms, validation.api_terms);
        overlay(
            &mut self.validation.require_api_env_vars,
            validation.require_api_env_vars,
        );

        overlay(&mut self.hosts.github_raw, hosts.github_raw);
        overlay(&mut self.hosts.gitlab, hosts.gitlab);
    }

    /// Reject values no layer should ever set
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(temperature) = self.generator.temperature
            && !(0.0..=1.0).contains(&temperature)
        {
            anyhow::bail!(
                "generator.temperature must be between 0 and 1, got {}",
                temperature
            );
        }

        if self.generator.max_tokens == Some(0) {
            anyhow::bail!("generator.max_tokens must be greater than 0");
        }

        if let Some(terms) = &self.validation.api_terms
            && terms.iter().any(|t| t.trim().is_empty())
        {
            anyhow::bail!("validation.api_terms must not contain empty terms");
        }

        Ok(())
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
