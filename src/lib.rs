//! ibsync - incremental iBroadcast library uploader
//!
//! A CLI tool that synchronizes a local media directory to an iBroadcast
//! library: it logs in, discovers the supported file extensions, walks
//! the tree, hashes each file (MD5, cached between runs and invalidated
//! by mtime), diffs against the server's hash manifest, and uploads the
//! missing files with bounded parallelism.

pub mod api;
pub mod cache;
pub mod cli;
pub mod error;
pub mod logging;
pub mod progress;
pub mod prompt;
pub mod scanner;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use yansi::Paint;

use crate::api::{ApiClient, RemoteLibrary, Session};
use crate::cache::HashCache;
use crate::cli::Cli;
use crate::error::ExitCode;
use crate::progress::Progress;
use crate::prompt::Action;
use crate::scanner::{FileEntry, Walker};
use crate::sync::SyncSummary;

/// Default cache file name, stored at the library root. The leading dot
/// keeps it out of the walker's candidate list.
pub const CACHE_FILE_NAME: &str = ".ibsync-cache.json";

/// Options for [`sync_library`], distilled from the CLI.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Where to load/save the hash cache; `None` disables persistence
    pub cache_path: Option<PathBuf>,
    /// Upload/hash worker count
    pub threads: usize,
    /// Suppress the progress bar
    pub quiet: bool,
}

/// Run the application: setup, discovery, confirmation, upload, cleanup.
///
/// Setup failures (bad root, login, manifest fetch) come back as `Err`;
/// the caller decides process termination.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let client = ApiClient::new().context("Failed to build HTTP client")?;
    let session = client
        .login(&cli.email, &cli.password)
        .context("Login failed")?;
    log::info!("Logged in as user {}", session.user_id);
    log::debug!(
        "Server supports {} file extensions",
        session.supported_extensions.len()
    );

    let files = Walker::new(&cli.dir, &session.supported_extensions)
        .walk()
        .context("Failed to scan the library root")?;

    let assume_yes = cli.yes;
    let confirm = move |files: &[FileEntry]| confirm_interactive(files, assume_yes);

    let options = SyncOptions {
        cache_path: if cli.no_cache {
            None
        } else {
            Some(cli.cache.clone().unwrap_or_else(|| cli.dir.join(CACHE_FILE_NAME)))
        },
        threads: cli.threads.max(1),
        quiet: cli.quiet,
    };

    let (code, summary) = sync_library(&options, &session, &client, files, &confirm)?;

    if summary.total() > 0 {
        println!(
            "{} uploaded, {} skipped, {} failed",
            summary.uploaded.green(),
            summary.skipped.yellow(),
            summary.failed.red()
        );
    }
    Ok(code)
}

/// Post-discovery core: confirmation, reconciliation, upload, cache save.
///
/// An empty candidate list short-circuits to [`ExitCode::NoFiles`] before
/// the confirmation callback or any manifest fetch. The confirmation is
/// an injected collaborator so this function never blocks on terminal
/// I/O; returning `false` aborts cleanly with [`ExitCode::Success`].
pub fn sync_library(
    options: &SyncOptions,
    session: &Session,
    remote: &dyn RemoteLibrary,
    files: Vec<FileEntry>,
    confirm: &dyn Fn(&[FileEntry]) -> Result<bool>,
) -> Result<(ExitCode, SyncSummary)> {
    if files.is_empty() {
        log::info!("No supported media files found");
        return Ok((ExitCode::NoFiles, SyncSummary::default()));
    }

    if !confirm(&files)? {
        log::info!("Aborted before upload");
        return Ok((ExitCode::Success, SyncSummary::default()));
    }

    let cache = match &options.cache_path {
        Some(path) => HashCache::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable hash cache: {e}");
            HashCache::new()
        }),
        None => HashCache::new(),
    };

    let manifest = remote
        .fetch_manifest(session)
        .context("Failed to fetch the server manifest")?;
    log::info!("Server already knows {} hashes", manifest.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .context("Failed to build the worker pool")?;
    let progress = Progress::new(options.quiet);

    let outcomes = sync::run_sync(
        files,
        &manifest,
        &cache,
        session,
        remote,
        &pool,
        Some(&progress),
    );

    // Persist whatever hash work completed, even after upload failures
    if let Some(path) = &options.cache_path {
        if let Err(e) = cache.save(path) {
            log::warn!("Failed to save hash cache: {e}");
        }
    }

    let summary = SyncSummary::from_outcomes(&outcomes);
    let code = if summary.failed > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    };
    Ok((code, summary))
}

/// Terminal confirmation flow: list/upload/quit, with an optional second
/// chance after listing. `--yes` bypasses the prompt entirely.
fn confirm_interactive(files: &[FileEntry], assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    match prompt::choose(files.len())? {
        Action::Upload => Ok(true),
        Action::Quit => {
            println!("Aborted.");
            Ok(false)
        }
        Action::List => {
            for file in files {
                println!(" - {}", file.relative);
            }
            let go = prompt::confirm_upload()?;
            if !go {
                println!("Aborted.");
            }
            Ok(go)
        }
    }
}
