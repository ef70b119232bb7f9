use std::fs::{self, File};
use std::io::Write;

use filetime::FileTime;
use ibsync::cache::HashCache;
use tempfile::tempdir;

fn write_file(path: &std::path::Path, content: &[u8], mtime: i64) {
    File::create(path).unwrap().write_all(content).unwrap();
    filetime::set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.mp3");
    let b = dir.path().join("b.mp3");
    write_file(&a, b"first", 1111);
    write_file(&b, b"second", 2222);

    let cache = HashCache::new();
    cache.md5_sum(&a, "a.mp3").unwrap();
    cache.md5_sum(&b, "sub/b.mp3").unwrap();

    let cache_file = dir.path().join("cache.json");
    cache.save(&cache_file).unwrap();

    let reloaded = HashCache::load(&cache_file).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.entry_for("a.mp3"), cache.entry_for("a.mp3"));
    assert_eq!(reloaded.entry_for("sub/b.mp3"), cache.entry_for("sub/b.mp3"));
}

#[test]
fn test_unchanged_mtime_never_recomputes_across_runs() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("song.mp3");
    write_file(&song, b"content", 5000);
    let cache_file = dir.path().join("cache.json");

    // First run hashes once
    let first_run = HashCache::new();
    let hash = first_run.md5_sum(&song, "song.mp3").unwrap();
    assert_eq!(first_run.hashes_computed(), 1);
    first_run.save(&cache_file).unwrap();

    // Second run with no edits reads nothing
    let second_run = HashCache::load(&cache_file).unwrap();
    assert_eq!(second_run.md5_sum(&song, "song.mp3").unwrap(), hash);
    assert_eq!(second_run.hashes_computed(), 0);
}

#[test]
fn test_legacy_cache_entry_reused_until_mtime_changes() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("songs")).unwrap();
    let song = dir.path().join("songs/x.mp3");
    write_file(&song, b"actual audio bytes", 1000);

    // Cache written by an earlier uploader version; the stored hash does
    // not match the file content, proving a hit never re-reads the file.
    let cache_file = dir.path().join("cache.json");
    fs::write(
        &cache_file,
        r#"{"songs/x.mp3": {"md5": "abc123", "mod": 1000}}"#,
    )
    .unwrap();

    let cache = HashCache::load(&cache_file).unwrap();
    assert_eq!(cache.md5_sum(&song, "songs/x.mp3").unwrap(), "abc123");
    assert_eq!(cache.hashes_computed(), 0);

    // mtime moves to 2000: the entry is stale and gets overwritten
    filetime::set_file_mtime(&song, FileTime::from_unix_time(2000, 0)).unwrap();
    let recomputed = cache.md5_sum(&song, "songs/x.mp3").unwrap();
    assert_ne!(recomputed, "abc123");
    assert_eq!(recomputed.len(), 32);
    assert_eq!(cache.hashes_computed(), 1);

    let entry = cache.entry_for("songs/x.mp3").unwrap();
    assert_eq!(entry.md5, recomputed);
    assert_eq!(entry.modified, 2000);
}

#[test]
fn test_content_change_with_new_mtime_recomputes() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("song.mp3");
    write_file(&song, b"version one", 1000);

    let cache = HashCache::new();
    let old_hash = cache.md5_sum(&song, "song.mp3").unwrap();

    write_file(&song, b"version two", 1001);
    let new_hash = cache.md5_sum(&song, "song.mp3").unwrap();
    assert_ne!(old_hash, new_hash);
    assert_eq!(cache.hashes_computed(), 2);
}

#[test]
fn test_stale_entries_for_removed_files_survive_save() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("song.mp3");
    write_file(&song, b"bytes", 3000);

    let cache = HashCache::new();
    cache.md5_sum(&song, "song.mp3").unwrap();
    fs::remove_file(&song).unwrap();

    let cache_file = dir.path().join("cache.json");
    cache.save(&cache_file).unwrap();

    // The entry for the removed file persists harmlessly
    let reloaded = HashCache::load(&cache_file).unwrap();
    assert!(reloaded.entry_for("song.mp3").is_some());
}
