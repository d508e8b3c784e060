//! Errors raised while collecting keys for a trie.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias for fallible trie construction.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that can occur while building a trie from a key file.
///
/// Building from in-memory keys never fails.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The key file could not be opened or read.
    #[error("failed to read keys from {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
