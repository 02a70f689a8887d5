//! Catalog cache maintenance commands
//! Usage: finterm cache [status|refresh|clear]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::Path;

use crate::catalog::{CatalogStore, CACHE_FILES};
use crate::config::is_cache_stale;
use crate::registry::CatalogKind;

/// Print the state of every catalog cache file.
pub fn status(settings_dir: &Path, cache_age_hours: u64) -> Result<()> {
    println!("Catalog caches in {}:", settings_dir.display());
    for file_name in CACHE_FILES {
        let path = settings_dir.join(file_name);
        if !path.exists() {
            println!("  {:<28} {}", file_name, "missing".yellow());
            continue;
        }
        let modified: DateTime<Utc> = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .into();
        let state = if is_cache_stale(&path, cache_age_hours) {
            "stale".yellow()
        } else {
            "fresh".green()
        };
        println!(
            "  {:<28} {} (updated {})",
            file_name,
            state,
            modified.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}

/// Delete all cache files and re-fetch every remote catalog.
pub fn refresh(store: &CatalogStore, settings_dir: &Path) -> Result<()> {
    clear(settings_dir)?;
    for kind in [
        CatalogKind::Ticker,
        CatalogKind::Metric,
        CatalogKind::ScreeningProfile,
        CatalogKind::Watchlist,
    ] {
        let count = store.catalog(kind).len();
        println!("  refreshed {kind:?} catalog ({count} entries)");
    }
    println!("{}", "Catalog caches refreshed.".green());
    Ok(())
}

/// Delete all cache files.
pub fn clear(settings_dir: &Path) -> Result<()> {
    for file_name in CACHE_FILES {
        let path = settings_dir.join(file_name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clear_removes_only_cache_files() {
        let dir = TempDir::new().unwrap();
        for file_name in CACHE_FILES {
            std::fs::write(dir.path().join(file_name), "x").unwrap();
        }
        std::fs::write(dir.path().join("config.yml"), "api: {}").unwrap();

        clear(dir.path()).unwrap();
        for file_name in CACHE_FILES {
            assert!(!dir.path().join(file_name).exists());
        }
        assert!(dir.path().join("config.yml").exists());
    }

    #[test]
    fn test_status_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        status(dir.path(), 48).unwrap();
    }
}
