//! Loaded-table cache.
//!
//! The source sheet is treated as immutable for a session, so a table is
//! loaded once per source identity and shared afterwards. The cache is an
//! ordinary value owned by the caller: tests build their own, and a reload
//! is an explicit `invalidate`.
//!
//! A source's identity is its canonical path plus the file's length and
//! modification time, so editing the file on disk yields a new key and a
//! fresh load even without invalidation. The read options that shape the
//! parsed table (worksheet, CSV delimiter) are part of the key too.

use crate::config::SourceConfig;
use crate::ingest;
use crate::logging::{self, LogSource};
use crate::model::{DashboardError, ShipmentTable};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Identity of a source file at a point in time, read a given way.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
    pub sheet: Option<String>,
    pub csv_delimiter: char,
}

impl SourceKey {
    /// Reads the file's metadata. Fails with `SourceUnavailable` if the file
    /// cannot be found.
    pub fn of(path: &Path, config: &SourceConfig) -> Result<Self, DashboardError> {
        let unavailable = |e: std::io::Error| DashboardError::SourceUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let canonical = path.canonicalize().map_err(unavailable)?;
        let meta = std::fs::metadata(&canonical).map_err(unavailable)?;
        Ok(SourceKey {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
            sheet: config.sheet.clone(),
            csv_delimiter: config.csv_delimiter,
        })
    }

    fn same_snapshot(&self, other: &SourceKey) -> bool {
        self.path == other.path && self.len == other.len && self.modified == other.modified
    }
}

/// Memo of loaded tables keyed by `SourceKey`.
///
/// Failed loads are not cached; the next call retries.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<SourceKey, Arc<ShipmentTable>>,
    hits: usize,
    misses: usize,
}

impl SourceCache {
    pub fn new() -> Self {
        SourceCache::default()
    }

    /// Returns the cached table for `path`, loading it on a miss.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        config: &SourceConfig,
    ) -> Result<Arc<ShipmentTable>, DashboardError> {
        let key = SourceKey::of(path, config)?;

        if let Some(table) = self.entries.get(&key) {
            self.hits += 1;
            logging::debug(LogSource::Cache, Some(&key.path.display().to_string()), "hit");
            return Ok(Arc::clone(table));
        }

        self.misses += 1;
        let table = Arc::new(ingest::load_table(path, config)?);

        // Older snapshots of the same file can never be hit again.
        self.entries.retain(|k, _| k.path != key.path || k.same_snapshot(&key));
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drops every entry for `path`. Returns whether anything was removed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let Ok(canonical) = path.canonicalize() else {
            // A file that no longer exists can only match by the path it was
            // loaded under.
            let before = self.entries.len();
            self.entries.retain(|k, _| k.path != path);
            return self.entries.len() != before;
        };
        let before = self.entries.len();
        self.entries.retain(|k, _| k.path != canonical);
        let removed = self.entries.len() != before;
        if removed {
            logging::info(LogSource::Cache, Some(&canonical.display().to_string()), "invalidated");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
