//! Language model access
//!
//! The generator only needs one operation from a model: turn a prompt into
//! reply text. [`CompletionClient`] is that seam; [`AnthropicClient`] is the
//! production implementation.

pub mod anthropic;
pub mod extract;

use std::future::Future;

use thiserror::Error;

pub use anthropic::{AnthropicClient, AnthropicOptions};
pub use extract::{ExtractError, FAILURE_MARKER, extract_json};

/// System instruction sent with every completion request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts MCP server package specifications from URLs. Your task is to analyze the provided URL and generate a valid package specification in JSON format.";

/// Errors from a completion round trip
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Anthropic API key is required")]
    MissingApiKey,

    #[error("Authentication failed (HTTP {status}): check your API key. {message}")]
    Unauthorized { status: u16, message: String },

    #[error("LLM request failed with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to fetch completion from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("LLM response could not be decoded: {0}")]
    InvalidResponse(String),
}

/// Produces reply text for a prompt
pub trait CompletionClient {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}
