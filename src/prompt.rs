//! Interactive confirmation prompt.
//!
//! The sync core never reads the terminal itself; it receives a single
//! decision value produced here (or bypassed entirely with `--yes`).

use anyhow::Result;
use dialoguer::{Confirm, Select};

/// Decision supplied by the user before the upload pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Print the discovered files, then ask again.
    List,
    /// Start the upload pass.
    Upload,
    /// Abort without uploading.
    Quit,
}

/// Ask what to do with the discovered files.
pub fn choose(found: usize) -> Result<Action> {
    let items = ["List files", "Start upload", "Quit"];
    let selection = Select::new()
        .with_prompt(format!("Found {found} supported files"))
        .items(&items)
        .default(1)
        .interact()?;
    Ok(match selection {
        0 => Action::List,
        1 => Action::Upload,
        _ => Action::Quit,
    })
}

/// Second-step confirmation after the file list was printed.
pub fn confirm_upload() -> Result<bool> {
    Confirm::new()
        .with_prompt("Start the upload?")
        .default(false)
        .interact()
        .map_err(Into::into)
}
