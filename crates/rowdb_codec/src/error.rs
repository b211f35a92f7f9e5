//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a document to JSON.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// The bytes are not valid JSON or do not match the document shape.
    #[error("decoding failed at line {line}, column {column}: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
        /// 1-based line of the error, 0 if unknown.
        line: usize,
        /// 1-based column of the error, 0 if unknown.
        column: usize,
    },

    /// The bytes are not valid UTF-8.
    #[error("invalid UTF-8 in document")]
    InvalidUtf8,
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::DecodingFailed {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}
