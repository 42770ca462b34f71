//! Error types for codex-sync.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a whole run.
///
/// Per-item failures during execution are not errors at this level; see
/// [`crate::executor::ItemFailure`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local root to reconcile does not exist or is not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The remote listing endpoint failed; no partial diff is attempted.
    #[error("failed to list remote content (page {page}): {source}")]
    Listing {
        page: usize,
        #[source]
        source: RemoteError,
    },
}

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The server answered with a non-success status.
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Reading the local file for upload failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RemoteError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Status { code, .. } => *code >= 500,
            RemoteError::Transport(_) => true,
            RemoteError::Decode(_) | RemoteError::Io { .. } => false,
        }
    }
}

impl From<ureq::Error> for RemoteError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => RemoteError::Status {
                code,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => RemoteError::Transport(transport.to_string()),
        }
    }
}
