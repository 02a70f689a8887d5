//! Application configuration and settings directory
//!
//! finterm keeps its state in a dotfile directory in the user's home
//! (`~/.finterm/`): the YAML app config plus the on-disk catalog cache
//! files that back the externally sourced completion catalogs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Name of the settings directory under the user's home.
pub const SETTINGS_DIR_NAME: &str = ".finterm";

/// Name of the YAML config file inside the settings directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Default age, in hours, after which a cached catalog file is refetched.
pub const DEFAULT_CACHE_AGE_HOURS: u64 = 48;

/// Default base URL of the market-data API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.investoreight.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    /// Named metric views offered by `--view_name` completion.
    pub metric_views: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Hours before a cached catalog file is considered stale.
    pub age_hours: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            metric_views: vec![
                "summary".to_string(),
                "performance".to_string(),
                "valuation".to_string(),
                "profitability".to_string(),
                "growth".to_string(),
                "liquidity".to_string(),
            ],
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            age_hours: DEFAULT_CACHE_AGE_HOURS,
        }
    }
}

impl AppConfig {
    /// Load the config from a settings directory, falling back to defaults
    /// when the file does not exist.
    pub fn load(settings_dir: &Path) -> Result<Self> {
        let path = settings_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Resolve the settings directory, creating it on first use.
pub fn settings_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(SETTINGS_DIR_NAME);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create settings directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Whether a cached catalog file is older than the configured age.
///
/// A missing file counts as stale so that callers fall through to a fetch.
/// An unreadable modification time also counts as stale; refetching is the
/// safe direction.
pub fn is_cache_stale(path: &Path, age_hours: u64) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return true;
    };
    let Ok(mtime) = metadata.modified() else {
        return true;
    };
    match SystemTime::now().duration_since(mtime) {
        Ok(age) => age > Duration::from_secs(age_hours * 3600),
        // mtime in the future: clock skew, treat as fresh
        Err(_) => false,
    }
}
