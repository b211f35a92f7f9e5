//! CLI error type.

use thiserror::Error;

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storage access failed.
    #[error(transparent)]
    Storage(#[from] rowdb_storage::StorageError),

    /// A table file could not be decoded.
    #[error("{file}: {source}")]
    Codec {
        /// The offending file.
        file: String,
        /// The decode error.
        source: rowdb_codec::CodecError,
    },

    /// The requested table file does not exist.
    #[error("table file not found: {0}")]
    TableNotFound(String),

    /// The output format is not supported.
    #[error("unknown output format: {0} (expected text or json)")]
    UnknownFormat(String),

    /// Output could not be rendered.
    #[error("rendering failed: {0}")]
    Render(#[from] serde_json::Error),

    /// One or more tables failed verification.
    #[error("verification failed for {0} table(s)")]
    VerificationFailed(usize),
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
