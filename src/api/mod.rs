//! Remote library service client.
//!
//! [`client::ApiClient`] speaks the iBroadcast JSON/multipart protocol:
//! a JSON login handshake that also returns the supported extension set,
//! a form-encoded manifest fetch, and one multipart POST per uploaded
//! file. The sync core consumes the service only through the
//! [`RemoteLibrary`] trait so tests can substitute an in-memory remote.

pub mod client;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub use client::{ApiClient, Session};

/// Errors from talking to the remote library service.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Credentials were rejected by the server.
    #[error("Login failed. Please check your email address and password")]
    LoginFailed,

    /// The server answered but the body did not have the expected shape.
    #[error("Unexpected response from {endpoint}: {detail}")]
    UnexpectedResponse {
        /// Endpoint that produced the response
        endpoint: String,
        /// What was missing or malformed
        detail: String,
    },

    /// The upload POST completed with a non-success status.
    #[error("Upload rejected with HTTP status {status}")]
    UploadRejected {
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The HTTP request itself failed.
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint the request was sent to
        endpoint: String,
        /// The underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// A local file could not be opened for upload.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// The remote side of a sync: the manifest of hashes the server already
/// holds, plus single-file upload.
pub trait RemoteLibrary: Send + Sync {
    /// Fetch the set of content hashes the server associates with the
    /// user's library.
    fn fetch_manifest(&self, session: &Session) -> Result<HashSet<String>, ApiError>;

    /// Upload one file. `Ok(())` only when the server reported success.
    fn upload(&self, session: &Session, file: &Path, relative: &str) -> Result<(), ApiError>;
}
