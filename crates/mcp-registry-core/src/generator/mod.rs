//! Package spec generation pipeline
//!
//! URL -> repository context -> prompt -> completion -> JSON extraction ->
//! schema validation. Every step runs sequentially; any hard failure aborts
//! the run without producing a spec.

pub mod prompt;

use thiserror::Error;
use url::Url;

use crate::llm::{CompletionClient, CompletionError, ExtractError, SYSTEM_PROMPT, extract_json};
use crate::source::{RawContentFetcher, RepoHost, RepoLocation};
use crate::spec::{PackageSpec, SpecError, SpecValidator};

pub use prompt::{MAX_README_CHARS, PromptContext, build_prompt};

/// Reasons a generation run fails
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid URL format: {0}. Please provide a valid URL in the format http(s)://domain.com/path")]
    InvalidUrl(String),

    #[error(
        "Could not determine README URL for repository: {0}. Only GitHub and GitLab repositories are currently supported."
    )]
    UnsupportedHost(String),

    #[error("LLM completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("Failed to generate package spec: {0}")]
    Schema(#[from] SpecError),
}

/// Drives one spec generation per call
#[derive(Debug)]
pub struct SpecGenerator<C> {
    client: C,
    fetcher: RawContentFetcher,
    validator: SpecValidator,
    prompt_override: Option<String>,
}

impl<C: CompletionClient> SpecGenerator<C> {
    pub fn new(client: C, fetcher: RawContentFetcher) -> Self {
        Self {
            client,
            fetcher,
            validator: SpecValidator::strict(),
            prompt_override: None,
        }
    }

    pub fn with_validator(mut self, validator: SpecValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Send `prompt` verbatim instead of building one from repository context
    pub fn with_prompt_override(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_override = Some(prompt.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Generate and validate a spec for the repository at `url`
    pub async fn generate_from_url(&self, url: &str) -> Result<PackageSpec, GenerateError> {
        let parsed = Url::parse(url).map_err(|_| GenerateError::InvalidUrl(url.to_string()))?;

        let prompt = match &self.prompt_override {
            Some(custom) => {
                tracing::info!("Using custom prompt for extraction");
                custom.clone()
            }
            None => {
                let location = RepoLocation::parse(&parsed)
                    .ok_or_else(|| GenerateError::UnsupportedHost(url.to_string()))?;
                let context = self.gather_context(&location, url).await;
                build_prompt(url, &context)
            }
        };

        let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        let value = extract_json(&reply)?;
        let spec = self.validator.validate_value(value)?;

        tracing::info!(id = %spec.id, name = %spec.name, "Generated package specification");
        Ok(spec)
    }

    /// Fetch README and manifest; failures are logged and skipped
    pub async fn gather_context(&self, location: &RepoLocation, url: &str) -> PromptContext {
        let readme = match self.fetcher.fetch_readme(location).await {
            Ok(text) => {
                tracing::info!(%url, "Fetched README from repository");
                Some(text)
            }
            Err(e) => {
                tracing::warn!("Could not fetch README content: {}", e);
                None
            }
        };

        // package.json is only looked up on GitHub
        let manifest = if location.host != RepoHost::GitHub {
            None
        } else {
            match self.fetcher.fetch_manifest(location).await {
                Ok(json) => {
                    let name = json.get("name").and_then(|n| n.as_str()).unwrap_or("unnamed");
                    tracing::info!(package = %name, "Fetched package.json");
                    serde_json::to_string_pretty(&json).ok()
                }
                Err(e) => {
                    tracing::warn!("Could not fetch package.json: {}", e);
                    None
                }
            }
        };

        PromptContext { readme, manifest }
    }
}
