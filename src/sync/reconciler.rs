//! Per-file upload decisions.
//!
//! For every candidate file the reconciler asks the hash cache for the
//! content hash (hashing in parallel across the worker pool; unchanged
//! files are served from cache without touching their content) and tests
//! the hash against the server manifest. A manifest hit is a skip;
//! anything else becomes an [`UploadTask`]. A file that cannot be hashed
//! is reported as failed and does not stop the run.

use std::collections::HashSet;

use rayon::prelude::*;

use super::{UploadOutcome, UploadStatus, UploadTask};
use crate::cache::HashCache;
use crate::scanner::{FileEntry, HashError};

/// Classify candidate files into upload tasks and immediate outcomes.
///
/// The input order (the walker sorts by relative path) is preserved, so
/// task ordinals are deterministic for an unchanged filesystem and
/// manifest. Ordinals are 1-based over the task count.
pub fn reconcile(
    files: Vec<FileEntry>,
    manifest: &HashSet<String>,
    cache: &HashCache,
    pool: &rayon::ThreadPool,
) -> (Vec<UploadTask>, Vec<UploadOutcome>) {
    let total_candidates = files.len();

    // Hash lookups run in the bounded pool; collect() preserves input order.
    let decisions: Vec<(FileEntry, Result<bool, HashError>)> = pool.install(|| {
        files
            .into_par_iter()
            .map(|entry| {
                let known = cache
                    .md5_sum(&entry.path, &entry.relative)
                    .map(|hash| is_known(manifest, &hash));
                (entry, known)
            })
            .collect()
    });

    let mut pending = Vec::new();
    let mut outcomes = Vec::new();
    for (entry, decision) in decisions {
        match decision {
            Ok(true) => {
                log::info!("Skipping {}, already uploaded", entry.relative);
                outcomes.push(UploadOutcome::new(entry.relative, UploadStatus::Skipped));
            }
            Ok(false) => pending.push(entry),
            Err(e) => {
                log::warn!("Cannot hash {}: {}", entry.relative, e);
                outcomes.push(UploadOutcome::new(
                    entry.relative,
                    UploadStatus::Failed(e.to_string()),
                ));
            }
        }
    }

    let total = pending.len();
    let tasks: Vec<UploadTask> = pending
        .into_iter()
        .enumerate()
        .map(|(index, entry)| UploadTask {
            entry,
            ordinal: index + 1,
            total,
        })
        .collect();

    log::info!(
        "Reconciled {} files: {} to upload, {} skipped, {} unreadable",
        total_candidates,
        tasks.len(),
        outcomes
            .iter()
            .filter(|o| o.status == UploadStatus::Skipped)
            .count(),
        outcomes
            .iter()
            .filter(|o| matches!(o.status, UploadStatus::Failed(_)))
            .count(),
    );

    (tasks, outcomes)
}

/// Manifest membership test.
///
/// Besides the fixed-width form, the leading-zero-stripped rendering is
/// tested as well: manifests still carry hashes written by old clients
/// whose integer-based hex conversion dropped leading zero nibbles.
fn is_known(manifest: &HashSet<String>, hash: &str) -> bool {
    if manifest.contains(hash) {
        return true;
    }
    let stripped = hash.trim_start_matches('0');
    let legacy = if stripped.is_empty() { "0" } else { stripped };
    legacy != hash && manifest.contains(legacy)
}
