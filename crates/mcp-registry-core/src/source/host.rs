//! Repository host recognition and raw-content URL construction

use serde::{Deserialize, Serialize};
use url::Url;

/// Branches tried in order when fetching raw content
pub const BRANCH_FALLBACK: [&str; 2] = ["main", "master"];

/// Supported git hosting providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoHost {
    GitHub,
    GitLab,
}

impl RepoHost {
    fn from_host(host: &str) -> Option<Self> {
        match host.strip_prefix("www.").unwrap_or(host) {
            "github.com" => Some(RepoHost::GitHub),
            "gitlab.com" => Some(RepoHost::GitLab),
            _ => None,
        }
    }
}

/// Base URLs for raw-content endpoints
///
/// Defaults point at the public providers; overriding them lets a mirror
/// or a local test server stand in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEndpoints {
    /// Base for GitHub raw files (`{base}/{owner}/{repo}/{branch}/{path}`)
    pub github_raw: String,
    /// Base for GitLab (`{base}/{owner}/{repo}/-/raw/{branch}/{path}`)
    pub gitlab: String,
}

impl Default for HostEndpoints {
    fn default() -> Self {
        Self {
            github_raw: "https://raw.githubusercontent.com".to_string(),
            gitlab: "https://gitlab.com".to_string(),
        }
    }
}

/// Owner/repository pair on a recognized host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub host: RepoHost,
    pub owner: String,
    pub repo: String,
}

impl RepoLocation {
    /// Recognize `host.com/{owner}/{repo}[/...]` URLs
    ///
    /// Returns `None` for other hosts or paths without owner and repo.
    pub fn parse(url: &Url) -> Option<Self> {
        let host = RepoHost::from_host(url.host_str()?)?;
        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            return None;
        }

        Some(Self {
            host,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Raw URL of `path` on `branch`
    pub fn raw_file_url(&self, endpoints: &HostEndpoints, branch: &str, path: &str) -> String {
        match self.host {
            RepoHost::GitHub => format!(
                "{}/{}/{}/{}/{}",
                endpoints.github_raw.trim_end_matches('/'),
                self.owner,
                self.repo,
                branch,
                path
            ),
            RepoHost::GitLab => format!(
                "{}/{}/{}/-/raw/{}/{}",
                endpoints.gitlab.trim_end_matches('/'),
                self.owner,
                self.repo,
                branch,
                path
            ),
        }
    }
}
