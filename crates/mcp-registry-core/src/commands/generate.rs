//! Generate command implementation.
//!
//! Resolves settings against caller options, runs the generation pipeline for
//! one repository URL and persists the resulting spec.

use std::path::PathBuf;

use anyhow::Context;

use crate::config::Settings;
use crate::generator::SpecGenerator;
use crate::llm::{AnthropicClient, AnthropicOptions, CompletionClient};
use crate::source::RawContentFetcher;
use crate::spec::{PackageSpec, determine_output_path, save_to_file};

/// Options for the generate command
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Repository URL to describe
    pub url: String,
    /// Anthropic API key
    pub api_key: String,
    /// Base directory for spec files, overriding config
    pub output_dir: Option<PathBuf>,
    /// Model id, overriding config
    pub model: Option<String>,
    /// Sampling temperature, overriding config
    pub temperature: Option<f32>,
    /// Prompt sent verbatim instead of the built one
    pub prompt_override: Option<String>,
    /// Skip writing the spec file
    pub dry_run: bool,
}

impl GenerateOptions {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            output_dir: None,
            model: None,
            temperature: None,
            prompt_override: None,
            dry_run: false,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_prompt_override(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_override = Some(prompt.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of a generate run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub spec: PackageSpec,
    /// Where the spec is (or would be) stored
    pub output_path: PathBuf,
    /// False on dry runs
    pub written: bool,
}

/// Generate command orchestrator
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    settings: Settings,
}

impl GenerateCommand {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run against the Anthropic API
    pub async fn execute(&self, options: &GenerateOptions) -> anyhow::Result<GenerateReport> {
        let generator = &self.settings.generator;
        let temperature = options.temperature.unwrap_or(generator.temperature);
        if !(0.0..=1.0).contains(&temperature) {
            anyhow::bail!("Temperature must be a number between 0 and 1.");
        }

        let client = AnthropicClient::new(
            AnthropicOptions::new(options.api_key.clone())
                .with_model(options.model.as_deref().unwrap_or(&generator.model))
                .with_temperature(temperature)
                .with_max_tokens(generator.max_tokens)
                .with_base_url(generator.api_base_url.clone()),
        )?;

        self.execute_with_client(client, options).await
    }

    /// Run with any completion backend
    pub async fn execute_with_client<C: CompletionClient>(
        &self,
        client: C,
        options: &GenerateOptions,
    ) -> anyhow::Result<GenerateReport> {
        let fetcher = RawContentFetcher::new(self.settings.hosts.clone())?;
        let mut generator =
            SpecGenerator::new(client, fetcher).with_validator(self.settings.spec_validator());
        if let Some(prompt) = &options.prompt_override {
            generator = generator.with_prompt_override(prompt.clone());
        }

        tracing::info!(url = %options.url, "Generating package specification");
        let spec = generator.generate_from_url(&options.url).await?;

        let output_dir = options
            .output_dir
            .as_deref()
            .unwrap_or(&self.settings.generator.output_dir);
        let output_path = determine_output_path(&spec, output_dir);

        if options.dry_run {
            tracing::info!(path = %output_path.display(), "Dry run; not writing spec");
            return Ok(GenerateReport {
                spec,
                output_path,
                written: false,
            });
        }

        save_to_file(&spec, &output_path)
            .with_context(|| format!("Failed to save package spec for {}", spec.id))?;

        Ok(GenerateReport {
            spec,
            output_path,
            written: true,
        })
    }
}
