//! Recursive discovery of supported media files.
//!
//! # Overview
//!
//! [`Walker`] traverses the library root and collects every regular file
//! whose extension is in the server-supplied supported set. Hidden files
//! and directories (names starting with `.`) are skipped, which also keeps
//! the hash cache file itself out of the candidate list. Playlist
//! extensions are excluded unconditionally: the server reports them as
//! supported but treats playlist files as perpetually changed, so syncing
//! them re-uploads every run.
//!
//! Results are sorted lexicographically by relative path so logs and task
//! ordinals are reproducible across runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{mtime_seconds, FileEntry, ScanError};

/// Extensions excluded even when the server claims to support them.
const PLAYLIST_EXTENSIONS: [&str; 3] = [".m3u", ".m3u8", ".pls"];

/// Directory walker for media file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Library root to walk
    root: PathBuf,
    /// Accepted extensions, lowercase with leading dot (e.g. `.mp3`)
    extensions: HashSet<String>,
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// `extensions` is the server-supplied supported set, with leading
    /// dots (e.g. `.mp3`). Matching is case-insensitive; playlist types
    /// are removed from the set here.
    #[must_use]
    pub fn new(root: &Path, extensions: &HashSet<String>) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.to_lowercase())
            .filter(|e| !PLAYLIST_EXTENSIONS.contains(&e.as_str()))
            .collect();
        Self {
            root: root.to_path_buf(),
            extensions,
        }
    }

    /// Walk the tree and return all matching files, sorted by relative path.
    ///
    /// A missing or non-directory root is an error; unreadable entries
    /// below the root are logged and skipped.
    pub fn walk(&self) -> Result<Vec<FileEntry>, ScanError> {
        if !self.root.exists() {
            return Err(ScanError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        let mut files = Vec::new();

        let walk = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.matches_extension(entry.path()) {
                log::trace!("Unsupported extension: {}", entry.path().display());
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let relative = relative_path(&self.root, entry.path());
            files.push(FileEntry::new(
                entry.path().to_path_buf(),
                relative,
                mtime_seconds(&metadata),
            ));
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        log::debug!(
            "Found {} supported files under {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }

    /// Check a path against the accepted extension set.
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&format!(".{}", e.to_lowercase())))
    }
}

/// Check whether an entry's own name starts with a dot.
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Path relative to the root, `/`-separated on all platforms.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let text = relative.to_string_lossy();
    if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_playlist_extensions_always_removed() {
        let walker = Walker::new(
            Path::new("."),
            &extensions(&[".mp3", ".m3u", ".m3u8", ".pls"]),
        );
        assert_eq!(walker.extensions, extensions(&[".mp3"]));
    }

    #[test]
    fn test_extension_set_lowercased() {
        let walker = Walker::new(Path::new("."), &extensions(&[".MP3", ".Flac"]));
        assert!(walker.matches_extension(Path::new("song.mp3")));
        assert!(walker.matches_extension(Path::new("song.FLAC")));
        assert!(!walker.matches_extension(Path::new("song.ogg")));
        assert!(!walker.matches_extension(Path::new("noextension")));
    }

    #[test]
    fn test_relative_path_strips_root() {
        let relative = relative_path(Path::new("/music"), Path::new("/music/songs/x.mp3"));
        assert_eq!(relative, "songs/x.mp3");
    }
}
