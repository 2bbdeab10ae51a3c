//! Error type for store, prompt and shell operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Hard failures surfaced to callers.
///
/// Malformed lines, rejected field edits and the structured mutation
/// outcomes (not-found, out-of-range, declined) are not errors; they are
/// reported through return values instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure on the store file or its temporary replacement.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record that cannot be written without breaking the file layout.
    #[error("invalid {field}: {reason}")]
    InvalidRecord { field: &'static str, reason: String },

    /// A rewrite transform gave up partway through.
    #[error("rewrite stage {stage} failed: {message}")]
    Transform { stage: String, message: String },

    /// The interactive input stream reached end of file.
    #[error("input closed")]
    InputClosed,

    /// Terminal I/O failure while prompting.
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] io::Error),
}

/// Result type for order-tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidRecord {
            field,
            reason: reason.into(),
        }
    }

    /// Check if the session ended because input ran out.
    pub fn is_input_closed(&self) -> bool {
        matches!(self, Error::InputClosed)
    }
}
