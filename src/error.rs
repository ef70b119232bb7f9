//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the ibsync application.
///
/// - 0: Success (every file uploaded or skipped)
/// - 1: General error (bad root directory, login failure, manifest fetch failure)
/// - 2: No supported media files found (clean no-op)
/// - 3: Partial success (run completed but some uploads failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: every candidate file was uploaded or skipped.
    Success = 0,
    /// General error: setup failed before the upload pass began.
    GeneralError = 1,
    /// No files: nothing under the root matched a supported extension.
    NoFiles = 2,
    /// Partial success: the run completed but at least one upload failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "IB000",
            Self::GeneralError => "IB001",
            Self::NoFiles => "IB002",
            Self::PartialSuccess => "IB003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "IB001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
