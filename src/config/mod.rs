use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "ledger.db";

/// Settings from `config.toml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Where bank exports are downloaded. Defaults to the user's Downloads folder.
    pub(crate) search_dir: Option<PathBuf>,
    pub(crate) extension: String,
    /// Ledger database. Defaults to the platform data directory.
    pub(crate) database: Option<PathBuf>,
    /// How many trailing ledger rows are compared against incoming transactions.
    pub(crate) tail_rows: u32,
    /// Skip files with malformed amounts or dates instead of aborting the run.
    pub(crate) skip_malformed: bool,
    /// Delete exports older than this many days after a sync.
    pub(crate) cleanup_after_days: Option<u64>,
    /// Merchant names that must never be truncated.
    pub(crate) merchant_exceptions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_dir: None,
            extension: "csv".into(),
            database: None,
            tail_rows: 500,
            skip_malformed: false,
            cleanup_after_days: None,
            merchant_exceptions: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        if config.extension.trim_start_matches('.').is_empty() {
            anyhow::bail!("extension must not be empty");
        }
        if config.tail_rows == 0 {
            anyhow::bail!("tail_rows must be at least 1");
        }
        Ok(config)
    }

    pub(crate) fn default_path() -> Option<PathBuf> {
        project_dirs().map(|d| d.config_dir().join(CONFIG_FILE))
    }

    pub(crate) fn search_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.search_dir {
            return Ok(expand_home(dir));
        }
        directories::UserDirs::new()
            .and_then(|u| u.download_dir().map(Path::to_path_buf))
            .ok_or_else(|| anyhow::anyhow!("Could not determine Downloads directory; set search_dir"))
    }

    /// Resolve the ledger path, creating its parent directory.
    pub(crate) fn database_path(&self) -> Result<PathBuf> {
        let path = match &self.database {
            Some(p) => expand_home(p),
            None => project_dirs()
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
                .data_dir()
                .join(DATABASE_FILE),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        Ok(path)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "ledgersync", "ledgersync")
}

/// Expand a leading `~/`.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => directories::BaseDirs::new()
            .map(|b| b.home_dir().join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
