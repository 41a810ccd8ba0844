//! Output path derivation and persistence for package specifications.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::PackageSpec;

/// File extension of persisted specs
pub const SPEC_EXTENSION: &str = "json";

/// Derive the file path a spec is stored at under `base_dir`
///
/// The file name comes from the lowercased `name` (whitespace runs become
/// hyphens), or from the first alias with its `mcp` marker removed when the
/// result does not start or end with a hyphen. Files are bucketed by the
/// lowercased first character of the file name.
pub fn determine_output_path(spec: &PackageSpec, base_dir: &Path) -> PathBuf {
    let mut filename = normalize_name(&spec.name);

    if let Some(alias) = spec.aliases.as_ref().and_then(|a| a.first())
        && let Some(stripped) = strip_mcp_marker(alias)
    {
        filename = stripped;
    }

    let bucket = filename
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect::<String>())
        .unwrap_or_else(|| "_".to_string());

    base_dir
        .join(bucket)
        .join(format!("{}.{}", filename, SPEC_EXTENSION))
}

/// Write a spec as pretty-printed JSON, creating parent directories
pub fn save_to_file(spec: &PackageSpec, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).with_context(|| {
            format!("Failed to save package spec: cannot create {}", dir.display())
        })?;
    }

    let json = serde_json::to_string_pretty(spec).context("Failed to save package spec")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to save package spec to {}", path.display()))?;

    tracing::info!(path = %path.display(), "Package specification saved");
    Ok(())
}

fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            in_space = false;
            out.push(if c == '/' || c == '\\' { '-' } else { c });
        }
    }
    out
}

/// Replace the first `-?mcp-?` occurrence with a hyphen, then collapse the
/// first double hyphen. Returns `None` when the result is unusable.
fn strip_mcp_marker(alias: &str) -> Option<String> {
    let stripped = match alias.find("mcp") {
        Some(pos) => {
            let mut start = pos;
            let mut end = pos + "mcp".len();
            if alias[..start].ends_with('-') {
                start -= 1;
            }
            if alias[end..].starts_with('-') {
                end += 1;
            }
            format!("{}-{}", &alias[..start], &alias[end..])
        }
        None => alias.to_string(),
    };
    let collapsed = stripped.replacen("--", "-", 1);

    if collapsed.is_empty()
        || collapsed.starts_with('-')
        || collapsed.ends_with('-')
        || collapsed.contains(['/', '\\'])
    {
        return None;
    }
    Some(collapsed)
}
