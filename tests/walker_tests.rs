use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;

use ibsync::scanner::{ScanError, Walker};
use tempfile::tempdir;

fn extensions(list: &[&str]) -> HashSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn touch(path: &std::path::Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_walk_filters_and_sorts() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("zebra.mp3"), b"z");
    touch(&dir.path().join("album/track01.flac"), b"t");
    touch(&dir.path().join("album/cover.jpg"), b"img");
    touch(&dir.path().join("notes.txt"), b"n");

    let walker = Walker::new(dir.path(), &extensions(&[".mp3", ".flac"]));
    let files = walker.walk().unwrap();

    let relatives: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();
    assert_eq!(relatives, vec!["album/track01.flac", "zebra.mp3"]);
}

#[test]
fn test_walk_skips_hidden_files_and_directories() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("visible.mp3"), b"v");
    touch(&dir.path().join(".hidden.mp3"), b"h");
    touch(&dir.path().join(".config/nested.mp3"), b"n");
    touch(&dir.path().join(".ibsync-cache.json"), b"{}");

    let walker = Walker::new(dir.path(), &extensions(&[".mp3", ".json"]));
    let files = walker.walk().unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].relative, "visible.mp3");
}

#[test]
fn test_walk_excludes_playlists_even_when_server_supports_them() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("song.mp3"), b"s");
    touch(&dir.path().join("list.m3u"), b"l");
    touch(&dir.path().join("list8.m3u8"), b"l8");
    touch(&dir.path().join("old.pls"), b"p");

    let walker = Walker::new(
        dir.path(),
        &extensions(&[".mp3", ".m3u", ".m3u8", ".pls"]),
    );
    let files = walker.walk().unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].relative, "song.mp3");
}

#[test]
fn test_walk_extension_match_is_case_insensitive() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("LOUD.MP3"), b"x");

    let walker = Walker::new(dir.path(), &extensions(&[".mp3"]));
    let files = walker.walk().unwrap();
    assert_eq!(files.len(), 1);
}

#[test]
fn test_walk_is_deterministic() {
    let dir = tempdir().unwrap();
    for name in ["c.mp3", "a.mp3", "b/d.mp3", "b/a.mp3"] {
        touch(&dir.path().join(name), name.as_bytes());
    }

    let walker = Walker::new(dir.path(), &extensions(&[".mp3"]));
    let first = walker.walk().unwrap();
    let second = walker.walk().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_walk_empty_directory() {
    let dir = tempdir().unwrap();
    let walker = Walker::new(dir.path(), &extensions(&[".mp3"]));
    assert!(walker.walk().unwrap().is_empty());
}

#[test]
fn test_walk_rejects_missing_root() {
    let dir = tempdir().unwrap();
    let walker = Walker::new(&dir.path().join("nope"), &extensions(&[".mp3"]));
    assert!(matches!(walker.walk(), Err(ScanError::NotFound(_))));
}

#[test]
fn test_walk_rejects_file_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("root.mp3");
    touch(&file, b"x");
    let walker = Walker::new(&file, &extensions(&[".mp3"]));
    assert!(matches!(walker.walk(), Err(ScanError::NotADirectory(_))));
}

#[test]
fn test_walk_records_relative_path_and_mtime() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("album/song.mp3");
    touch(&song, b"x");
    filetime::set_file_mtime(&song, filetime::FileTime::from_unix_time(1234, 0)).unwrap();

    let walker = Walker::new(dir.path(), &extensions(&[".mp3"]));
    let files = walker.walk().unwrap();
    assert_eq!(files[0].relative, "album/song.mp3");
    assert_eq!(files[0].modified, 1234);
    assert_eq!(files[0].path, song);
}
