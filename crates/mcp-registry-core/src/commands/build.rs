//! Build command implementation.

use std::path::PathBuf;

use crate::config::Settings;
use crate::registry::{BuildError, BuildReport, RegistryBuilder, RegistryValidator};

/// Options for the build command
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Apply the full package spec rules before building
    pub strict: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(source_dir.into());
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Build command orchestrator
#[derive(Debug, Clone)]
pub struct BuildCommand {
    settings: Settings,
}

impl BuildCommand {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn builder(&self, options: &BuildOptions) -> RegistryBuilder {
        let registry = &self.settings.registry;
        let builder = RegistryBuilder::new(
            options
                .source_dir
                .clone()
                .unwrap_or_else(|| registry.source_dir.clone()),
            options
                .output_dir
                .clone()
                .unwrap_or_else(|| registry.build_dir.clone()),
        );
        if options.strict {
            builder.with_validator(RegistryValidator::strict(self.settings.spec_validator()))
        } else {
            builder
        }
    }

    /// Validate, then write `repository.json` and `index.html`
    pub fn execute(&self, options: &BuildOptions) -> Result<BuildReport, BuildError> {
        let builder = self.builder(options);
        tracing::info!(
            source = %builder.source_dir().display(),
            output = %builder.output_dir().display(),
            strict = options.strict,
            "Building registry"
        );
        builder.build()
    }
}
