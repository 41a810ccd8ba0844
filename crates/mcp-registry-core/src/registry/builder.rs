//! Registry builder
//!
//! Validates the source tree, merges every definition into one
//! `repository.json` and writes a static `index.html` next to it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{Map, Value};
use thiserror::Error;

use super::definition::{self, DefinitionFile};
use super::validator::{RegistryValidator, ValidationReport};

pub const REPOSITORY_FILE: &str = "repository.json";
pub const INDEX_FILE: &str = "index.html";
/// Top-level key holding the merged server map
pub const SERVERS_KEY: &str = "mcpServers";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Validation failed with errors in {} file(s). Aborting build.", .0.files_with_errors())]
    ValidationFailed(Box<ValidationReport>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub repository_path: PathBuf,
    pub index_path: PathBuf,
    /// Definition files merged, in merge order
    pub definition_files: Vec<PathBuf>,
    /// Number of servers in `repository.json`
    pub server_count: usize,
    /// Server ids defined more than once; the last definition wins
    pub duplicates: Vec<String>,
    /// blake3 hex digest of `repository.json`
    pub checksum: String,
    pub validation: ValidationReport,
}

/// Builds the combined registry from a source tree
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    source_dir: PathBuf,
    output_dir: PathBuf,
    validator: RegistryValidator,
}

impl RegistryBuilder {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            validator: RegistryValidator::new(),
        }
    }

    pub fn with_validator(mut self, validator: RegistryValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validate, merge and write the registry
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let validation = self.validator.validate_dir(&self.source_dir)?;
        if validation.has_errors() {
            return Err(BuildError::ValidationFailed(Box::new(validation)));
        }

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;

        let definition_files = definition::discover(&self.source_dir)?;
        let (servers, duplicates) = merge_definitions(&definition_files)?;
        let server_count = servers.len();

        let mut repository = Map::new();
        repository.insert(SERVERS_KEY.to_string(), Value::Object(servers));
        let content =
            serde_json::to_string_pretty(&repository).context("Failed to serialize registry")?;

        let repository_path = self.output_dir.join(REPOSITORY_FILE);
        std::fs::write(&repository_path, &content)
            .with_context(|| format!("Failed to write {}", repository_path.display()))?;
        tracing::info!(
            path = %repository_path.display(),
            servers = server_count,
            "Wrote combined registry"
        );

        let index_path = self.output_dir.join(INDEX_FILE);
        let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        std::fs::write(&index_path, render_index(server_count, &generated_at))
            .with_context(|| format!("Failed to write {}", index_path.display()))?;

        Ok(BuildReport {
            output_dir: self.output_dir.clone(),
            repository_path,
            index_path,
            definition_files,
            server_count,
            duplicates,
            checksum: blake3::hash(content.as_bytes()).to_hex().to_string(),
            validation,
        })
    }
}

/// Merge definition files in order; later ids replace earlier ones
pub fn merge_definitions(files: &[PathBuf]) -> anyhow::Result<(Map<String, Value>, Vec<String>)> {
    let mut servers = Map::new();
    let mut duplicates = Vec::new();

    for path in files {
        let file = DefinitionFile::load(path)?;
        for (id, server) in file.entries {
            if servers.insert(id.clone(), server).is_some() {
                tracing::warn!(%id, file = %path.display(), "Duplicate server id; later definition wins");
                duplicates.push(id);
            }
        }
    }

    Ok((servers, duplicates))
}

/// Static landing page linking to the registry file
pub fn render_index(server_count: usize, generated_at: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>MCP Server Definitions</title>
    <style>
      body {{
        font-family: Menlo, Monaco, Consolas, "Courier New", monospace;
        font-size: 12px;
      }}
    </style>
  </head>
  <body>
    <p>
      <a href="{REPOSITORY_FILE}">{REPOSITORY_FILE}</a>
    </p>
    <p>{server_count} server definitions, generated {generated_at}</p>
  </body>
</html>
"#
    )
}
