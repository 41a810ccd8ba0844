//! Raw-content fetching with branch fallback
//!
//! README and package.json are fetched from the hosting provider's raw file
//! endpoints, trying `main` first and `master` second.

use anyhow::Context;
use serde_json::Value;
use thiserror::Error;

use super::host::{BRANCH_FALLBACK, HostEndpoints, RepoHost, RepoLocation};

pub const README_PATH: &str = "README.md";
pub const MANIFEST_PATH: &str = "package.json";

/// Why a raw-content fetch failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "{url} not found (404 error). The repository may be private, empty, or structured differently."
    )]
    NotFound { url: String },

    #[error(
        "Access forbidden (403 error) for {url}. The repository may require authentication or have access restrictions."
    )]
    Forbidden { url: String },

    #[error("Rate limit exceeded (429 error) for {url}. Too many requests to the git hosting service.")]
    RateLimited { url: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Only GitHub repositories are supported for package.json fetching")]
    ManifestUnsupported,

    #[error("package.json is not valid JSON: {0}")]
    InvalidManifest(#[from] serde_json::Error),
}

/// Fetches files from repository hosts
#[derive(Debug, Clone)]
pub struct RawContentFetcher {
    client: reqwest::Client,
    endpoints: HostEndpoints,
}

impl RawContentFetcher {
    pub fn new(endpoints: HostEndpoints) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mcp-registry/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &HostEndpoints {
        &self.endpoints
    }

    /// Fetch README.md text
    pub async fn fetch_readme(&self, location: &RepoLocation) -> Result<String, FetchError> {
        self.fetch_with_fallback(location, README_PATH).await
    }

    /// Fetch and parse package.json (GitHub only)
    pub async fn fetch_manifest(&self, location: &RepoLocation) -> Result<Value, FetchError> {
        if location.host != RepoHost::GitHub {
            return Err(FetchError::ManifestUnsupported);
        }
        let body = self.fetch_with_fallback(location, MANIFEST_PATH).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch `path`, trying each fallback branch in turn
    ///
    /// Returns the error of the last attempt when every branch fails.
    pub async fn fetch_with_fallback(
        &self,
        location: &RepoLocation,
        path: &str,
    ) -> Result<String, FetchError> {
        let mut last_error = None;
        for branch in BRANCH_FALLBACK {
            let url = location.raw_file_url(&self.endpoints, branch, path);
            match self.fetch_text(&url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::debug!(%url, error = %e, "Raw content fetch failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(FetchError::NotFound {
            url: path.to_string(),
        }))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let url = url.to_string();
            return Err(match status.as_u16() {
                404 => FetchError::NotFound { url },
                403 => FetchError::Forbidden { url },
                429 => FetchError::RateLimited { url },
                code => FetchError::Status { url, status: code },
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
