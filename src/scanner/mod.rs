//! Scanner module for directory traversal and file hashing.
//!
//! This module provides:
//! - Recursive discovery of supported media files ([`walker`])
//! - Streaming MD5 content hashing ([`hasher`])
//!
//! The walker applies the server-supplied extension filter and skips
//! hidden files and directories; the hasher renders digests as fixed-width
//! lowercase hex, the identity the sync protocol expects.

pub mod hasher;
pub mod walker;

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

pub use hasher::md5_file;
pub use walker::Walker;

/// Metadata for a discovered media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Path relative to the library root, `/`-separated on all platforms.
    /// This is the key the hash cache and upload requests use.
    pub relative: String,
    /// Last modification time, seconds since the Unix epoch
    pub modified: i64,
}

impl FileEntry {
    /// Create a new `FileEntry`.
    #[must_use]
    pub fn new(path: PathBuf, relative: String, modified: i64) -> Self {
        Self {
            path,
            relative,
            modified,
        }
    }
}

/// Convert file metadata to seconds since the Unix epoch.
///
/// Pre-epoch timestamps come back negative rather than erroring, so very
/// old mtimes still invalidate correctly.
#[must_use]
pub fn mtime_seconds(metadata: &std::fs::Metadata) -> i64 {
    match metadata.modified() {
        Ok(time) => match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        },
        // Platforms without mtime support; treat as never-cached
        Err(_) => -1,
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while walking the tree.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while hashing a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error for the given path.
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
