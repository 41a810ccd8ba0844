//! Terminal output for command results.
//!
//! Everything goes through a [`Reporter`] so tests can capture output.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use console::style;

use mcp_registry_core::registry::{BuildReport, FileReport, Severity, ValidationReport};

/// Extra hints printed under an error, chosen by message content
pub fn suggestion(message: &str) -> Option<&'static [&'static str]> {
    const API_KEY: &[&str] = &[
        "Suggestion: Check your API key or set it in the .env file.",
        "Example .env file content:",
        "ANTHROPIC_API_KEY=your_api_key_here",
    ];
    const URL: &[&str] = &[
        "Suggestion: Make sure the URL is valid and points to a git repository.",
        "Example: https://github.com/username/repo",
    ];
    const FETCH: &[&str] = &[
        "Suggestion: Check your internet connection or try again later.",
        "The URL might be temporarily unavailable or require authentication.",
    ];
    const JSON: &[&str] = &[
        "Suggestion: The LLM might have generated invalid JSON.",
        "Try again with a different temperature setting (e.g., --temperature 0.1)",
    ];

    [("API key", API_KEY), ("URL", URL), ("fetch", FETCH), ("JSON", JSON)]
        .into_iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|(_, lines)| lines)
}

/// Render an error with its causes, skipping causes already quoted by the
/// message above them
pub fn diagnostic(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    for cause in error.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

pub struct Reporter<W: Write = io::Stdout> {
    writer: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl Reporter<io::Stderr> {
    pub fn stderr() -> Self {
        Self {
            writer: io::stderr(),
        }
    }
}

impl<W: Write> Reporter<W> {
    #[cfg(test)]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn generate_error(&mut self, error: &anyhow::Error) -> Result<()> {
        let message = diagnostic(error);
        writeln!(self.writer, "❌ Error generating package specification:")?;
        writeln!(self.writer, "   {}", message)?;
        if let Some(lines) = suggestion(&message) {
            writeln!(self.writer)?;
            for line in lines {
                writeln!(self.writer, "{}", line)?;
            }
        }
        Ok(())
    }

    pub fn missing_api_key(&mut self) -> Result<()> {
        writeln!(
            self.writer,
            "Error: API key is required. Provide it with --api-key or set ANTHROPIC_API_KEY environment variable."
        )?;
        Ok(())
    }

    pub fn validation_header(&mut self) -> Result<()> {
        writeln!(
            self.writer,
            "{}",
            style("MCP Server Definition Validator").cyan()
        )?;
        writeln!(
            self.writer,
            "{}",
            style("================================").cyan()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// Per-file findings followed by a summary
    pub fn validation(&mut self, report: &ValidationReport) -> Result<()> {
        self.validation_header()?;

        if report.files.is_empty() {
            writeln!(
                self.writer,
                "{}",
                style("No server definition files found.").yellow()
            )?;
            return Ok(());
        }

        writeln!(
            self.writer,
            "Found {} server definition files to validate.\n",
            report.total_files()
        )?;

        for file in &report.files {
            self.file_report(file)?;
        }

        writeln!(self.writer, "\n=== Validation Summary ===")?;
        writeln!(self.writer, "Total files: {}", report.total_files())?;
        writeln!(self.writer, "Server definitions: {}", report.server_count())?;
        writeln!(self.writer, "Valid files: {}", report.valid_files())?;
        writeln!(self.writer, "Files with errors: {}", report.files_with_errors())?;
        if report.warning_count() > 0 {
            writeln!(self.writer, "Warnings: {}", report.warning_count())?;
        }

        if report.has_errors() {
            writeln!(
                self.writer,
                "\n{}",
                style("Validation failed with errors.").red()
            )?;
        } else {
            writeln!(
                self.writer,
                "\n{}",
                style("All server definitions are valid!").green()
            )?;
        }
        Ok(())
    }

    fn file_report(&mut self, file: &FileReport) -> Result<()> {
        writeln!(self.writer, "Validating {}... ", file.path.display())?;
        for issue in &file.issues {
            match issue.severity {
                Severity::Error => writeln!(
                    self.writer,
                    "  {}",
                    style(format!("ERROR: {}", issue.message)).red()
                )?,
                Severity::Warning => writeln!(
                    self.writer,
                    "  {}",
                    style(format!("WARNING: {}", issue.message)).yellow()
                )?,
            }
        }
        if !file.has_errors() {
            writeln!(self.writer, "  {}", style("VALID").green())?;
        }
        Ok(())
    }

    /// Build summary, output listing and the local-open hint
    pub fn build(&mut self, report: &BuildReport, show_open_hint: bool) -> Result<()> {
        writeln!(
            self.writer,
            "Found {} server definition files:",
            report.definition_files.len()
        )?;
        for file in &report.definition_files {
            writeln!(self.writer, "- {}", file.display())?;
        }

        for id in &report.duplicates {
            writeln!(
                self.writer,
                "{}",
                style(format!("WARNING: Server {} is defined more than once; the last definition wins", id))
                    .yellow()
            )?;
        }

        writeln!(
            self.writer,
            "✅ Created {} with {} servers",
            report.repository_path.display(),
            report.server_count
        )?;
        writeln!(self.writer, "   blake3 {}", report.checksum)?;
        writeln!(self.writer, "📄 Created {}", report.index_path.display())?;

        self.output_listing(&report.output_dir)?;

        writeln!(self.writer, "\n🎉 Build completed successfully!")?;

        if show_open_hint {
            let index = std::path::absolute(&report.index_path)
                .unwrap_or_else(|_| report.index_path.clone());
            writeln!(self.writer, "\nYou can open the files locally with:")?;
            writeln!(self.writer, "  open {}", index.display())?;
        }
        Ok(())
    }

    fn output_listing(&mut self, output_dir: &Path) -> Result<()> {
        writeln!(self.writer, "\nOutput directory contents:")?;
        let mut entries = std::fs::read_dir(output_dir)?
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let size = entry.metadata()?.len();
            writeln!(
                self.writer,
                "- {} ({} bytes)",
                entry.file_name().to_string_lossy(),
                size
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use mcp_registry_core::generator::GenerateError;
    use mcp_registry_core::registry::Issue;
    use mcp_registry_core::spec::SpecError;

    fn output(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_suggestion_order() {
        assert_eq!(suggestion("Anthropic API key is required").unwrap().len(), 3);
        assert!(suggestion("Invalid URL format: x").unwrap()[0].contains("URL is valid"));
        assert!(suggestion("Failed to fetch completion").unwrap()[0].contains("internet"));
        assert!(suggestion("Invalid JSON in LLM response").unwrap()[0].contains("invalid JSON"));
        assert!(suggestion("something else").is_none());
    }

    #[test]
    fn test_suggestion_first_match_wins() {
        // contains both "URL" and "JSON"
        let lines = suggestion("Could not extract valid JSON for URL").unwrap();
        assert!(lines[0].contains("URL is valid"));
    }

    #[test]
    fn test_generate_error_includes_suggestion() {
        let mut reporter = Reporter::with_writer(Vec::new());
        reporter
            .generate_error(&anyhow::anyhow!("Invalid JSON in LLM response: expected value"))
            .unwrap();
        let text = output(reporter);
        assert!(text.starts_with("❌ Error generating package specification:\n"));
        assert!(text.contains("   Invalid JSON in LLM response"));
        assert!(text.contains("--temperature 0.1"));
    }

    #[test]
    fn test_generate_error_prints_cause_chain() {
        let cause = io::Error::new(io::ErrorKind::NotADirectory, "Not a directory");
        let error = anyhow::Error::new(cause).context("Failed to save package spec for a/b");

        let mut reporter = Reporter::with_writer(Vec::new());
        reporter.generate_error(&error).unwrap();
        let text = output(reporter);

        assert!(text.contains("   Failed to save package spec for a/b: Not a directory\n"));
    }

    #[test]
    fn test_diagnostic_skips_quoted_causes() {
        let error = anyhow::Error::new(GenerateError::Schema(SpecError::NodeModuleWithoutDocker))
            .context("Generation failed");
        let text = diagnostic(&error);

        assert_eq!(
            text,
            format!(
                "Generation failed: Failed to generate package spec: {}",
                SpecError::NodeModuleWithoutDocker
            )
        );
    }

    #[test]
    fn test_validation_summary() {
        let report = ValidationReport {
            files: vec![
                FileReport {
                    path: PathBuf::from("mcp-servers/a/a.json"),
                    servers: 1,
                    issues: vec![],
                },
                FileReport {
                    path: PathBuf::from("mcp-servers/b/b.json"),
                    servers: 2,
                    issues: vec![Issue::error("Missing 'name' for server b")],
                },
            ],
        };

        let mut reporter = Reporter::with_writer(Vec::new());
        reporter.validation(&report).unwrap();
        let text = output(reporter);

        assert!(text.contains("Found 2 server definition files to validate."));
        assert!(text.contains("ERROR: Missing 'name' for server b"));
        assert!(text.contains("Server definitions: 3"));
        assert!(text.contains("Valid files: 1"));
        assert!(text.contains("Files with errors: 1"));
        assert!(text.contains("Validation failed with errors."));
    }

    #[test]
    fn test_validation_without_files() {
        let mut reporter = Reporter::with_writer(Vec::new());
        reporter.validation(&ValidationReport::default()).unwrap();
        assert!(output(reporter).contains("No server definition files found."));
    }
}
