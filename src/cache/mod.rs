//! Hash caching module for ibsync.
//!
//! This module provides persistent storage for file content hashes so
//! unchanged libraries are not rehashed on every run.
//!
//! # Architecture
//!
//! * [`store`]: the in-memory concurrent map plus JSON load/save.
//! * [`entry`]: the data model stored per file.
//!
//! # Cache Invalidation
//!
//! Entries are keyed by relative path and validated by modification time
//! only. If the recorded mtime differs from the file's current mtime, the
//! entry is stale and the file is rehashed. This is a deliberate
//! cache-coherence shortcut: a file rewritten with identical mtime within
//! the same second can dodge invalidation, which is acceptable for a
//! media library that changes through normal tagging and imports.
//!
//! Entries for files that no longer exist on disk persist across runs;
//! they are never consulted and cost only a few bytes in the cache file.

pub mod entry;
pub mod store;

pub use entry::CacheEntry;
pub use store::{CacheError, HashCache};
