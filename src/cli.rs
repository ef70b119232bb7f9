//! Command-line interface definitions for ibsync.
//!
//! # Example
//!
//! ```bash
//! # Sync the current directory, prompting before the upload starts
//! ibsync you@example.com secret
//!
//! # Sync a specific library root without prompting, 8 parallel uploads
//! ibsync you@example.com secret --dir ~/Music --threads 8 --yes
//!
//! # Credentials can also come from the environment
//! IBSYNC_EMAIL=you@example.com IBSYNC_PASSWORD=secret ibsync -y
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Incremental uploader for iBroadcast media libraries.
///
/// ibsync walks a local media directory, hashes each file (MD5, cached
/// between runs), compares the hashes against what the server already
/// knows, and uploads only the missing files.
#[derive(Debug, Parser)]
#[command(name = "ibsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Account email address
    #[arg(value_name = "EMAIL", env = "IBSYNC_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(value_name = "PASSWORD", env = "IBSYNC_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Root directory of the media library
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    pub dir: PathBuf,

    /// Number of parallel upload workers (default: 4)
    ///
    /// Lower values reduce disk thrashing and outbound connection pressure.
    #[arg(long, value_name = "N", default_value = "4")]
    pub threads: usize,

    /// Skip the interactive prompt and start uploading immediately
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Path to the hash cache file
    ///
    /// If not specified, `.ibsync-cache.json` inside the library root is used.
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Disable hash caching
    #[arg(long, conflicts_with = "cache")]
    pub no_cache: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}
