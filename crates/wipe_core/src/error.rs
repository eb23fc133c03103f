use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced by the sanitization core.
///
/// Every lower-level failure is wrapped with the operation and path that
/// produced it before it reaches the batch orchestrator. The core never
/// retries; a file's failure is fatal for that file (and, in a directory
/// batch, for the batch once the pool drains), never for files already
/// removed.
#[derive(Debug, Error)]
pub enum WipeError {
    /// A filesystem operation on a specific path failed.
    #[error("failed to {op} '{}'", path.display())]
    Io {
        /// The operation that failed (stat, open, write, flush, truncate, remove).
        op: &'static str,
        /// The path the operation targeted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A rename step of a name-obfuscation chain failed.
    #[error("failed to rename '{}'", path.display())]
    Rename {
        /// The path that could not be renamed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The OS entropy source could not be read.
    #[error("entropy source unavailable")]
    RngUnavailable {
        /// The underlying RNG error.
        #[source]
        source: rand_core::Error,
    },

    /// Directory-tree traversal failed.
    #[error("directory walk failed at '{}'", path.display())]
    Walk {
        /// The path being traversed when the failure occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl WipeError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        WipeError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn walk(path: &Path, source: io::Error) -> Self {
        WipeError::Walk {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Failure of a rename chain, carrying the last path that still exists.
///
/// The chain may have completed any number of rounds before failing, so
/// callers must treat [`RenameChainError::reached`] as the authoritative
/// current name of the entry.
#[derive(Debug, Error)]
#[error("name obfuscation stopped at '{}'", reached.display())]
pub struct RenameChainError {
    /// The last path the entry was successfully renamed to (or the
    /// original path if no round completed).
    pub reached: PathBuf,
    /// The failure that interrupted the chain.
    #[source]
    pub source: WipeError,
}

impl From<RenameChainError> for WipeError {
    fn from(err: RenameChainError) -> Self {
        err.source
    }
}
