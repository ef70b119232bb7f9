//! Concurrent hash cache with JSON persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::cache::CacheEntry;
use crate::scanner::{hasher, mtime_seconds, HashError};

/// Errors from loading or saving the cache file.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing the cache file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Cache file path
        path: std::path::PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The cache file exists but is not valid JSON of the expected shape.
    #[error("Invalid cache file {path}: {source}")]
    Parse {
        /// Cache file path
        path: std::path::PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Process-wide mapping from relative path to cached hash.
///
/// Safe for concurrent use from the upload workers: lookups and inserts
/// go through a sharded concurrent map, so unrelated paths never
/// serialize against each other. Two workers racing on the *same* path
/// may both hash the file; each run visits every path once, so in
/// practice that race never occurs, and both would store the same value.
#[derive(Debug, Default)]
pub struct HashCache {
    entries: DashMap<String, CacheEntry>,
    computed: AtomicUsize,
}

impl HashCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache from a JSON file.
    ///
    /// A missing file is not an error; it yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        if !path.exists() {
            log::debug!("No cache file at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: BTreeMap<String, CacheEntry> =
            serde_json::from_str(&content).map_err(|source| CacheError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let cache = Self::new();
        for (relative, entry) in parsed {
            cache.entries.insert(relative, entry);
        }
        log::debug!(
            "Loaded {} cached hashes from {}",
            cache.entries.len(),
            path.display()
        );
        Ok(cache)
    }

    /// Save the cache to a JSON file, overwriting any previous content.
    ///
    /// Keys are written in sorted order so the file diffs cleanly between
    /// runs. Safe to call after a partially failed upload pass; whatever
    /// hash work completed is persisted.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let snapshot: BTreeMap<String, CacheEntry> = self
            .entries
            .iter()
            .map(|kv| (kv.key().clone(), kv.value().clone()))
            .collect();

        // Sorted map serialization cannot fail; any error here is a bug
        // in CacheEntry's derive.
        let content =
            serde_json::to_string_pretty(&snapshot).map_err(|source| CacheError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, content).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Saved {} cached hashes to {}",
            snapshot.len(),
            path.display()
        );
        Ok(())
    }

    /// Get the content hash for a file, computing it only when needed.
    ///
    /// Returns the cached hash when the stored mtime matches the file's
    /// current mtime; otherwise streams the file through MD5 and replaces
    /// the entry with the new hash and mtime.
    pub fn md5_sum(&self, file: &Path, relative: &str) -> Result<String, HashError> {
        let metadata = fs::metadata(file).map_err(|e| HashError::from_io(file, e))?;
        let modified = mtime_seconds(&metadata);

        if let Some(entry) = self.entries.get(relative) {
            if entry.modified == modified {
                log::trace!("Cache hit: {relative}");
                return Ok(entry.md5.clone());
            }
            log::trace!(
                "Cache stale for {relative}: stored mtime {}, current {modified}",
                entry.modified
            );
        }

        // Hash outside any map lock so a large file never blocks lookups
        // of other paths.
        let md5 = hasher::md5_file(file)?;
        self.computed.fetch_add(1, Ordering::Relaxed);
        self.entries
            .insert(relative.to_string(), CacheEntry::new(md5.clone(), modified));
        Ok(md5)
    }

    /// Look up the stored entry for a relative path.
    #[must_use]
    pub fn entry_for(&self, relative: &str) -> Option<CacheEntry> {
        self.entries.get(relative).map(|kv| kv.value().clone())
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of hashes actually computed (not served from cache) since
    /// this instance was created.
    #[must_use]
    pub fn hashes_computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }
}
