//! On-disk catalog cache
//!
//! Externally sourced catalogs persist as tab-delimited tabular files in
//! the settings directory, one file per value kind. A file older than the
//! configured age is refetched transparently; a corrupt file is discarded
//! and refetched. Reads and writes take `fs2` advisory locks since other
//! terminal processes may share the settings directory.

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

use crate::config::is_cache_stale;

/// Load rows from a cache file, fetching and rewriting it when the file is
/// missing, stale, or unreadable. A failed fetch propagates as an error so
/// the caller can degrade to an empty catalog without memoizing (the next
/// invocation retries).
pub fn load_or_fetch<T, F, E>(path: &Path, age_hours: u64, fetch: F) -> Result<Vec<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Result<Vec<T>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    if path.exists() && !is_cache_stale(path, age_hours) {
        match read_rows(path) {
            Ok(rows) => return Ok(rows),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable cache file");
            }
        }
    }

    let rows = fetch().with_context(|| {
        format!(
            "Failed to fetch catalog backing cache file: {}",
            path.display()
        )
    })?;

    // Cache write failure is not fatal; the catalog is still usable.
    if let Err(e) = write_rows(path, &rows) {
        warn!(path = %path.display(), error = %e, "failed to write cache file");
    }
    Ok(rows)
}

/// Read all rows from a tab-delimited cache file under a shared lock.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open cache: {}", path.display()))?;
    file.lock_shared()
        .with_context(|| format!("Failed to lock cache for reading: {}", path.display()))?;
    let mut content = String::new();
    (&file)
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read cache: {}", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(content.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.with_context(|| format!("Malformed cache row in {}", path.display()))?);
    }
    Ok(rows)
}

/// Write rows to a tab-delimited cache file under an exclusive lock.
///
/// The file is truncated only after the lock is held, so a concurrent
/// reader never observes a half-written file.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let content = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush cache rows")?;

    #[allow(clippy::suspicious_open_options)]
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open cache for writing: {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("Failed to lock cache for writing: {}", path.display()))?;
    file.set_len(0)
        .with_context(|| format!("Failed to truncate cache: {}", path.display()))?;
    file.write_all(&content)
        .with_context(|| format!("Failed to write cache: {}", path.display()))?;
    file.flush()?;
    Ok(())
}
