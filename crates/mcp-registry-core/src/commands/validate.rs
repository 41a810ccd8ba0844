//! Validate command implementation.

use std::path::PathBuf;

use crate::config::Settings;
use crate::registry::{RegistryValidator, ValidationReport};

/// Options for the validate command
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Definition source directory, overriding config
    pub source_dir: Option<PathBuf>,
    /// Also run the full schema validator on every server
    pub strict: bool,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(source_dir.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Validate command orchestrator
#[derive(Debug, Clone)]
pub struct ValidateCommand {
    settings: Settings,
}

impl ValidateCommand {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn source_dir(&self, options: &ValidateOptions) -> PathBuf {
        options
            .source_dir
            .clone()
            .unwrap_or_else(|| self.settings.registry.source_dir.clone())
    }

    /// Validate the source tree; findings are returned, not raised
    pub fn execute(&self, options: &ValidateOptions) -> anyhow::Result<ValidationReport> {
        let validator = if options.strict {
            RegistryValidator::strict(self.settings.spec_validator())
        } else {
            RegistryValidator::new()
        };
        validator.validate_dir(&self.source_dir(options))
    }
}
