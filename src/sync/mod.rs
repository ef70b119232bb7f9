//! The incremental-upload engine.
//!
//! This module decides, per candidate file, whether an upload is needed
//! ([`reconciler`]) and runs the resulting tasks with bounded parallelism
//! ([`executor`]). Both stages share one rayon pool sized by the
//! `--threads` flag; hashing and upload I/O are the only suspension
//! points, and per-file failures never abort the batch.

pub mod executor;
pub mod reconciler;

use std::collections::HashSet;

use crate::api::{RemoteLibrary, Session};
use crate::cache::HashCache;
use crate::progress::ProgressCallback;
use crate::scanner::FileEntry;

pub use executor::execute;
pub use reconciler::reconcile;

/// Outcome status for a single candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// The server already has this content hash.
    Skipped,
    /// The upload attempt returned the success status.
    Succeeded,
    /// Hashing or the upload attempt failed; the reason is human-readable.
    Failed(String),
}

/// Per-file result of the sync pass. Produced once per candidate file,
/// used only for reporting.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Path relative to the library root
    pub relative: String,
    /// What happened to the file
    pub status: UploadStatus,
}

impl UploadOutcome {
    fn new(relative: String, status: UploadStatus) -> Self {
        Self { relative, status }
    }
}

/// A file the reconciler decided must be uploaded. Consumed exactly once
/// by the executor.
#[derive(Debug, Clone)]
pub struct UploadTask {
    /// The file to upload
    pub entry: FileEntry,
    /// 1-based position among this run's upload tasks
    pub ordinal: usize,
    /// Total number of upload tasks in this run
    pub total: usize,
}

/// Aggregate counts for a completed sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    /// Files uploaded successfully
    pub uploaded: usize,
    /// Files skipped because the server already had them
    pub skipped: usize,
    /// Files that failed to hash or upload
    pub failed: usize,
}

impl SyncSummary {
    /// Tally outcomes into a summary.
    #[must_use]
    pub fn from_outcomes(outcomes: &[UploadOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status {
                UploadStatus::Skipped => summary.skipped += 1,
                UploadStatus::Succeeded => summary.uploaded += 1,
                UploadStatus::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Total number of outcomes tallied.
    #[must_use]
    pub fn total(&self) -> usize {
        self.uploaded + self.skipped + self.failed
    }
}

/// Run the full reconcile-then-upload pass over the candidate files.
///
/// Returns one outcome per candidate file, in no particular order beyond
/// skips first (reconciliation order) followed by upload completions.
pub fn run_sync(
    files: Vec<FileEntry>,
    manifest: &HashSet<String>,
    cache: &HashCache,
    session: &Session,
    remote: &dyn RemoteLibrary,
    pool: &rayon::ThreadPool,
    progress: Option<&dyn ProgressCallback>,
) -> Vec<UploadOutcome> {
    let (tasks, mut outcomes) = reconcile(files, manifest, cache, pool);
    let mut uploaded = execute(tasks, session, remote, pool, progress);
    outcomes.append(&mut uploaded);
    outcomes
}
