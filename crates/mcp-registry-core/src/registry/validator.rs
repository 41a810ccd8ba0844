//! Registry-wide validation of server definition files
//!
//! Every file is checked independently. Problems are collected rather than
//! raised so a single run reports everything wrong with the tree.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::definition::{self, DefinitionFile};
use crate::spec::{MethodKind, PackageSpecDraft, SpecValidator, is_provided};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding in a definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Findings for one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    /// Number of server definitions found in the file
    pub servers: usize,
    pub issues: Vec<Issue>,
}

impl FileReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Findings for a whole source tree
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    pub fn valid_files(&self) -> usize {
        self.files.iter().filter(|f| !f.has_errors()).count()
    }

    pub fn files_with_errors(&self) -> usize {
        self.total_files() - self.valid_files()
    }

    pub fn has_errors(&self) -> bool {
        self.files.iter().any(FileReport::has_errors)
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warnings().count()).sum()
    }

    /// Server definitions found across all files
    pub fn server_count(&self) -> usize {
        self.files.iter().map(|f| f.servers).sum()
    }
}

/// Validates definition files
///
/// The default checks are field-presence only. Strict mode additionally runs
/// every server through a [`SpecValidator`].
#[derive(Debug, Clone, Default)]
pub struct RegistryValidator {
    strict: Option<SpecValidator>,
}

impl RegistryValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(spec_validator: SpecValidator) -> Self {
        Self {
            strict: Some(spec_validator),
        }
    }

    /// Validate every definition file under `source_dir`
    pub fn validate_dir(&self, source_dir: &Path) -> anyhow::Result<ValidationReport> {
        let files = definition::discover(source_dir)?;
        tracing::debug!(count = files.len(), dir = %source_dir.display(), "Validating definition files");

        Ok(ValidationReport {
            files: files.iter().map(|path| self.validate_file(path)).collect(),
        })
    }

    pub fn validate_file(&self, path: &Path) -> FileReport {
        match std::fs::read_to_string(path) {
            Ok(content) => self.validate_content(path, &content),
            Err(e) => FileReport {
                path: path.to_path_buf(),
                servers: 0,
                issues: vec![Issue::error(format!("Failed to read file: {}", e))],
            },
        }
    }

    pub fn validate_content(&self, path: &Path, content: &str) -> FileReport {
        let mut report = FileReport {
            path: path.to_path_buf(),
            servers: 0,
            issues: Vec::new(),
        };

        let file = match DefinitionFile::parse(path, content) {
            Ok(file) => file,
            Err(e) => {
                report.issues.push(Issue::error(e.to_string()));
                return report;
            }
        };

        report.servers = file.entries.len();
        if file.entries.is_empty() {
            report
                .issues
                .push(Issue::warning("No server definitions found"));
            return report;
        }

        for (server_id, server) in file.entries {
            self.check_server(&server_id, server, &mut report.issues);
        }
        report
    }

    fn check_server(&self, server_id: &str, server: Value, issues: &mut Vec<Issue>) {
        let mut draft = match PackageSpecDraft::from_value(server) {
            Ok(draft) => draft,
            Err(e) => {
                issues.push(Issue::error(format!(
                    "Invalid definition for server {}: {}",
                    server_id, e
                )));
                return;
            }
        };

        let errors_before = issues.len();

        if !is_provided(draft.name.as_ref()) {
            issues.push(Issue::error(format!("Missing 'name' for server {}", server_id)));
        }

        if !is_provided(draft.description.as_ref()) {
            issues.push(Issue::warning(format!(
                "Missing 'description' for server {}",
                server_id
            )));
        }

        match draft.methods() {
            Some(methods) if !methods.is_empty() => {
                for kind in [
                    MethodKind::NodeModule,
                    MethodKind::PythonModule,
                    MethodKind::Docker,
                ] {
                    if let Some(method) = methods.get(kind)
                        && !is_provided(method.identifier_value(kind))
                    {
                        issues.push(Issue::error(format!(
                            "Missing '{}' for {} installation method of {}",
                            kind.required_field(),
                            kind,
                            server_id
                        )));
                    }
                }
                for unknown in methods.unknown.keys() {
                    issues.push(Issue::warning(format!(
                        "Unknown installation method '{}' for server {}",
                        unknown, server_id
                    )));
                }
            }
            _ if draft.installation_options.is_some() => {
                issues.push(Issue::error(format!(
                    "Server {} uses the unsupported installationOptions list; convert it to installationMethods",
                    server_id
                )));
            }
            _ => {
                issues.push(Issue::error(format!(
                    "No installation methods defined for server {}",
                    server_id
                )));
            }
        }

        let has_new_errors = issues[errors_before..]
            .iter()
            .any(|i| i.severity == Severity::Error);

        // keyed files carry the id as the map key
        if draft.id.is_none() {
            draft.id = Some(Value::String(server_id.to_string()));
        }

        if let Some(validator) = &self.strict
            && !has_new_errors
            && let Err(e) = validator.validate(draft)
        {
            issues.push(Issue::error(format!("{} ({})", e, server_id)));
        }
    }
}
