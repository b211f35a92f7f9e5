//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The blob name cannot be mapped to a file inside the data directory.
    #[error("invalid blob name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The data directory does not exist or is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: String,
    },

    /// The new content replaced the file but the directory entry could not
    /// be synced. The write is visible and may not survive a crash.
    #[error("{name} written but not synced: {source}")]
    NotDurable {
        /// The blob that was written.
        name: String,
        /// The sync error.
        source: io::Error,
    },
}

impl StorageError {
    /// Returns whether the write this error came from replaced the content.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::NotDurable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_durable_is_committed() {
        let not_durable = StorageError::NotDurable {
            name: "User.json".into(),
            source: io::Error::other("fsync"),
        };
        assert!(not_durable.is_committed());
        assert!(!StorageError::Io(io::Error::other("disk full")).is_committed());
        assert_eq!(
            not_durable.to_string(),
            "User.json written but not synced: fsync"
        );
    }
}
