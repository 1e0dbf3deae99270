//! Error types for mail composition.

use std::io;
use std::path::PathBuf;

use crate::host::LaunchError;

/// Result type alias for mail composition.
pub type Result<T> = std::result::Result<T, Error>;

/// Mail composition error types.
///
/// The two recoverable launch failures (access denied, no handler) never
/// reach this type from the dispatcher; they are reported to the user and
/// turned into `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host failed to launch a request for an unexpected reason.
    #[error("Launch failed: {0}")]
    Launch(#[from] LaunchError),

    /// An attachment path cannot be expressed as a file URL.
    #[error("Invalid attachment {}: {reason}", .path.display())]
    Attachment {
        /// Offending path.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// ASCII-compatible encoding of an address failed.
    #[error("IDNA encoding failed: {0}")]
    Idna(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates an attachment error.
    #[must_use]
    pub fn attachment(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Attachment {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
