//! Repository sources
//!
//! Recognizes GitHub/GitLab repository URLs and fetches raw files
//! (README, package.json) used as context for spec generation.

pub mod fetcher;
pub mod host;

pub use fetcher::{FetchError, MANIFEST_PATH, README_PATH, RawContentFetcher};
pub use host::{BRANCH_FALLBACK, HostEndpoints, RepoHost, RepoLocation};
