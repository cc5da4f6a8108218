use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Files in `dir` with the given extension (case-insensitive), oldest first by
/// modification time.
pub(crate) fn discover_input_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut found: Vec<(SystemTime, PathBuf)> = matching_files(dir, extension)?;
    found.sort();
    debug!(dir = %dir.display(), count = found.len(), "discovered input files");
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Delete matching files last modified more than `max_age` ago.
pub(crate) fn clean_stale_files(dir: &Path, extension: &str, max_age: Duration) -> Result<Vec<PathBuf>> {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = Vec::new();
    for (modified, path) in matching_files(dir, extension)? {
        if modified < cutoff {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            info!(file = %path.display(), "removed stale export");
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}

fn matching_files(dir: &Path, extension: &str) -> Result<Vec<(SystemTime, PathBuf)>> {
    let wanted = extension.trim_start_matches('.').to_lowercase();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.to_lowercase() == wanted);
        if !matches {
            continue;
        }
        let meta = entry
            .metadata()
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        found.push((modified, path));
    }
    Ok(found)
}

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
