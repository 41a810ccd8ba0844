//! Anthropic Messages API client

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, CompletionError};

pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
const API_VERSION: &str = "2023-06-01";

/// Settings for [`AnthropicClient`]
#[derive(Debug, Clone)]
pub struct AnthropicOptions {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Base URL of the API, without the `/v1/messages` path
    pub base_url: String,
}

impl AnthropicOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Completion client backed by the Anthropic Messages API
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    options: AnthropicOptions,
}

impl AnthropicClient {
    pub fn new(options: AnthropicOptions) -> anyhow::Result<Self> {
        if options.api_key.trim().is_empty() {
            return Err(CompletionError::MissingApiKey.into());
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("mcp-registry/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &AnthropicOptions {
        &self.options
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.options.base_url.trim_end_matches('/'))
    }
}

impl CompletionClient for AnthropicClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let url = self.messages_url();
        let request = MessagesRequest {
            model: &self.options.model,
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.options.model, %url, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.options.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|source| CompletionError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| CompletionError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            let status = status.as_u16();
            return Err(match status {
                401 | 403 => CompletionError::Unauthorized { status, message },
                _ => CompletionError::Status { status, message },
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        Ok(text)
    }
}
