//! Server definition files
//!
//! A definition file is either a single package spec (it has
//! `installationMethods`, or a string `id` and `name`, at the top level) or
//! an object mapping server ids to package specs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{Map, Value};
use thiserror::Error;

/// Glob, relative to the source directory, matching definition files
pub const DEFINITION_PATTERN: &str = "**/*.json";

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Definition file must contain a JSON object")]
    NotAnObject,
}

/// A parsed definition file
#[derive(Debug, Clone)]
pub struct DefinitionFile {
    pub path: PathBuf,
    /// Server id and raw definition, in file order
    pub entries: Vec<(String, Value)>,
}

impl DefinitionFile {
    /// Parse file content
    pub fn parse(path: &Path, content: &str) -> Result<Self, DefinitionError> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Object(object) = value else {
            return Err(DefinitionError::NotAnObject);
        };

        if is_single_spec(&object) {
            let key = object
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| file_stem(path));
            return Ok(Self {
                path: path.to_path_buf(),
                entries: vec![(key, Value::Object(object))],
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries: object.into_iter().collect(),
        })
    }

    /// Read and parse a file from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(path, &content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

fn is_single_spec(object: &Map<String, Value>) -> bool {
    let is_text = |key: &str| object.get(key).is_some_and(Value::is_string);
    object.contains_key("installationMethods")
        || object.contains_key("installationOptions")
        || (is_text("id") && is_text("name"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Find definition files under `source_dir`, sorted by path
pub fn discover(source_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&source_dir.to_string_lossy());
    let pattern = Path::new(&base).join(DEFINITION_PATTERN);
    let pattern = pattern.to_string_lossy();

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).context("Invalid definition file pattern")? {
        let path = entry.context("Failed to read definition directory entry")?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
