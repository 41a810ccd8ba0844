//! mcp-registry - MCP server package spec generator
//!
//! Usage:
//!   mcp-registry generate <URL>   # Generate a package spec for a repository
//!   mcp-registry validate         # Validate server definition files
//!   mcp-registry build [DIR]      # Build repository.json and index.html

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcp_registry_core::commands::{
    BuildCommand, BuildOptions, GenerateCommand, GenerateOptions, ValidateCommand, ValidateOptions,
};
use mcp_registry_core::config::{ConfigStore, Settings};
use mcp_registry_core::registry::BuildError;

use crate::report::Reporter;

/// Environment variable holding the Anthropic API key
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Parser)]
#[command(name = "mcp-registry")]
#[command(version, about = "Generate MCP server package specifications from URLs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a package specification from a repository URL
    Generate {
        /// URL to generate package specification from
        url: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Temperature for LLM generation (0 to 1)
        #[arg(short, long)]
        temperature: Option<String>,

        /// API key for the LLM service (defaults to ANTHROPIC_API_KEY)
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Send the contents of this file as the prompt instead of building one
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// Print the spec instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate all server definition files
    Validate {
        /// Directory holding the definition files
        #[arg(long)]
        source: Option<PathBuf>,

        /// Also apply the full package spec rules
        #[arg(long)]
        strict: bool,
    },

    /// Validate, then build repository.json and index.html
    Build {
        /// Output directory
        output_dir: Option<PathBuf>,

        /// Directory holding the definition files
        #[arg(long)]
        source: Option<PathBuf>,

        /// Also apply the full package spec rules
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_registry=info,mcp_registry_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        tracing::warn!("Failed to load .env file: {}", e);
    }

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ Error: {}", report::diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    let settings = ConfigStore::with_defaults()?.load()?;

    match command {
        Commands::Generate {
            url,
            output,
            model,
            temperature,
            api_key,
            prompt_file,
            dry_run,
        } => run_generate(
            settings,
            GenerateArgs {
                url,
                output,
                model,
                temperature,
                api_key,
                prompt_file,
                dry_run,
            },
        ),
        Commands::Validate { source, strict } => run_validate(settings, source, strict),
        Commands::Build {
            output_dir,
            source,
            strict,
        } => run_build(settings, output_dir, source, strict),
    }
}

struct GenerateArgs {
    url: String,
    output: Option<PathBuf>,
    model: Option<String>,
    temperature: Option<String>,
    api_key: Option<String>,
    prompt_file: Option<PathBuf>,
    dry_run: bool,
}

fn run_generate(settings: Settings, args: GenerateArgs) -> Result<ExitCode> {
    let mut stderr = Reporter::stderr();

    let api_key = args
        .api_key
        .filter(|key| !key.is_empty())
        .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()));
    let Some(api_key) = api_key else {
        stderr.missing_api_key()?;
        return Ok(ExitCode::FAILURE);
    };

    let temperature = match args.temperature.as_deref().map(parse_temperature) {
        Some(Some(t)) => Some(t),
        Some(None) => {
            eprintln!("Error: Temperature must be a number between 0 and 1.");
            return Ok(ExitCode::FAILURE);
        }
        None => None,
    };

    let mut options = GenerateOptions::new(&args.url, api_key).with_dry_run(args.dry_run);
    if let Some(output) = args.output {
        options = options.with_output_dir(output);
    }
    if let Some(model) = args.model {
        options = options.with_model(model);
    }
    if let Some(temperature) = temperature {
        options = options.with_temperature(temperature);
    }
    if let Some(path) = &args.prompt_file {
        let prompt = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;
        options = options.with_prompt_override(prompt);
    }

    println!("Generating package specification for {}...", args.url);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let command = GenerateCommand::new(settings);
    match runtime.block_on(command.execute(&options)) {
        Ok(report) if report.written => {
            println!(
                "✅ Success! Package specification saved to {}",
                report.output_path.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report.spec)?);
            println!("Would save to {}", report.output_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            stderr.generate_error(&e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Parse a temperature flag; `None` when it is not a number in 0..=1
fn parse_temperature(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|t| (0.0..=1.0).contains(t))
}

fn run_validate(settings: Settings, source: Option<PathBuf>, strict: bool) -> Result<ExitCode> {
    let mut options = ValidateOptions::new().with_strict(strict);
    if let Some(source) = source {
        options = options.with_source_dir(source);
    }

    let report = ValidateCommand::new(settings).execute(&options)?;
    Reporter::stdout().validation(&report)?;

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_build(
    settings: Settings,
    output_dir: Option<PathBuf>,
    source: Option<PathBuf>,
    strict: bool,
) -> Result<ExitCode> {
    let mut options = BuildOptions::new().with_strict(strict);
    if let Some(source) = source {
        options = options.with_source_dir(source);
    }
    if let Some(output_dir) = output_dir {
        options = options.with_output_dir(output_dir);
    }

    let command = BuildCommand::new(settings);
    let output = command.builder(&options).output_dir().to_path_buf();
    println!("Using output directory: {}", output.display());
    println!("🔍 Validating JSON files...");

    let mut reporter = Reporter::stdout();
    match command.execute(&options) {
        Ok(report) => {
            reporter.validation(&report.validation)?;
            println!("✅ Validation completed successfully\n");
            let in_ci = std::env::var("CI").is_ok_and(|v| v == "true");
            reporter.build(&report, !in_ci)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(BuildError::ValidationFailed(validation)) => {
            reporter.validation(&validation)?;
            eprintln!("❌ Validation failed. Aborting build.");
            Ok(ExitCode::FAILURE)
        }
        Err(BuildError::Other(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_temperature() {
        assert_eq!(parse_temperature("0.2"), Some(0.2));
        assert_eq!(parse_temperature("0"), Some(0.0));
        assert_eq!(parse_temperature("1"), Some(1.0));
        assert_eq!(parse_temperature("1.5"), None);
        assert_eq!(parse_temperature("-0.1"), None);
        assert_eq!(parse_temperature("warm"), None);
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "mcp-registry",
            "generate",
            "https://github.com/acme/tool",
            "-o",
            "out",
            "-t",
            "0.1",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                url,
                output,
                temperature,
                dry_run,
                ..
            } => {
                assert_eq!(url, "https://github.com/acme/tool");
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(temperature.as_deref(), Some("0.1"));
                assert!(dry_run);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_parses_build_output_dir() {
        let cli = Cli::try_parse_from(["mcp-registry", "build", "public"]).unwrap();
        match cli.command {
            Commands::Build {
                output_dir,
                source,
                strict,
            } => {
                assert_eq!(output_dir, Some(PathBuf::from("public")));
                assert!(source.is_none());
                assert!(!strict);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_cli_parses_build_strict() {
        let cli = Cli::try_parse_from(["mcp-registry", "build", "--strict"]).unwrap();
        match cli.command {
            Commands::Build {
                output_dir, strict, ..
            } => {
                assert!(output_dir.is_none());
                assert!(strict);
            }
            _ => panic!("expected build"),
        }
    }
}
