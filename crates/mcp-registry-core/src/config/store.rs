//! Layered config store: global file, then project file.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::paths::{global_config_dir, global_config_path, project_config_path};
use super::{ConfigFile, Settings, parser};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    global_path: Option<PathBuf>,
    project_path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the platform config dir and the current directory
    pub fn with_defaults() -> anyhow::Result<Self> {
        let project_root =
            std::env::current_dir().context("Failed to determine current directory")?;
        let global_dir = global_config_dir();
        if global_dir.is_none() {
            tracing::debug!("Could not determine config directory; skipping global config");
        }
        Ok(Self::from_paths(global_dir, project_root))
    }

    pub fn from_paths(global_dir: Option<PathBuf>, project_root: PathBuf) -> Self {
        Self {
            global_path: global_dir.as_deref().map(global_config_path),
            project_path: project_config_path(&project_root),
        }
    }

    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Merge the global and project files; missing files are skipped
    pub fn load_file(&self) -> anyhow::Result<ConfigFile> {
        let mut merged = ConfigFile::new();
        for path in self.global_path.iter().chain(std::iter::once(&self.project_path)) {
            if !path.exists() {
                continue;
            }
            tracing::debug!(path = %path.display(), "Loading config layer");
            merged.merge(parser::parse_config_file(path)?);
        }
        Ok(merged)
    }

    /// Resolve layered settings on top of built-in defaults
    pub fn load(&self) -> anyhow::Result<Settings> {
        Ok(Settings::from_file(self.load_file()?))
    }
}
