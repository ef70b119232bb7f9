//! Bounded-parallel upload execution.
//!
//! Exactly one attempt per task. A transport failure or non-success
//! status marks that file failed and the remaining tasks proceed;
//! outcomes arrive in completion order and carry the ordinal/total pair
//! for progress display.

use rayon::prelude::*;

use super::{UploadOutcome, UploadStatus, UploadTask};
use crate::api::{RemoteLibrary, Session};
use crate::progress::ProgressCallback;

/// Upload every task on the given pool, one attempt each.
pub fn execute(
    tasks: Vec<UploadTask>,
    session: &Session,
    remote: &dyn RemoteLibrary,
    pool: &rayon::ThreadPool,
    progress: Option<&dyn ProgressCallback>,
) -> Vec<UploadOutcome> {
    if tasks.is_empty() {
        log::info!("Nothing to upload");
        return Vec::new();
    }

    if let Some(p) = progress {
        p.on_phase_start("upload", tasks.len());
    }

    let outcomes = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|task| {
                if let Some(p) = progress {
                    p.on_progress(task.ordinal, &task.entry.relative);
                }
                log::info!(
                    "[{}/{}] Uploading {}",
                    task.ordinal,
                    task.total,
                    task.entry.relative
                );

                let status = match remote.upload(session, &task.entry.path, &task.entry.relative)
                {
                    Ok(()) => {
                        log::info!("[{}/{}] Done: {}", task.ordinal, task.total, task.entry.relative);
                        UploadStatus::Succeeded
                    }
                    Err(e) => {
                        log::warn!(
                            "[{}/{}] Failed: {}: {}",
                            task.ordinal,
                            task.total,
                            task.entry.relative,
                            e
                        );
                        UploadStatus::Failed(e.to_string())
                    }
                };
                UploadOutcome::new(task.entry.relative, status)
            })
            .collect()
    });

    if let Some(p) = progress {
        p.on_phase_end("upload");
    }

    outcomes
}
