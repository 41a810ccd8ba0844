//! Config path resolution helpers.

use std::path::{Path, PathBuf};

/// File name of both the global and the project configuration
pub const CONFIG_FILE: &str = "config.toml";
pub const PROJECT_CONFIG_FILE: &str = "mcp-registry.toml";
/// Directory under the platform config dir
pub const APP_DIR: &str = "mcp-registry";

/// `~/.config/mcp-registry` (or the platform equivalent)
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

pub fn global_config_path(global_dir: &Path) -> PathBuf {
    global_dir.join(CONFIG_FILE)
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        assert_eq!(
            global_config_path(Path::new("/home/u/.config/mcp-registry")),
            PathBuf::from("/home/u/.config/mcp-registry/config.toml")
        );
        assert_eq!(
            project_config_path(Path::new("/work/registry")),
            PathBuf::from("/work/registry/mcp-registry.toml")
        );
    }
}
