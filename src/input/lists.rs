use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Expand a leading `~` in user-supplied paths.
pub fn expand_user(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

fn read_labeled(path: &Path, label: &str) -> Result<String> {
    if !path.is_file() {
        bail!("{} file not found: {}", label, path.display());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", label, path.display()))
}

/// Load the set of URLs already used in drafts.
///
/// One URL per line; blank lines and `#`-prefixed comment lines are ignored.
pub fn load_used_links(path: &Path) -> Result<HashSet<String>> {
    let text = read_labeled(path, "used-links")?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Load deliverable header patterns, one per line, blank lines dropped.
pub fn load_patterns(path: &Path) -> Result<Vec<String>> {
    let text = read_labeled(path, "patterns")?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
