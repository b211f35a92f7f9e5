//! Error types for RowDB core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in RowDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] rowdb_storage::StorageError),

    /// Table document codec error.
    #[error("codec error: {0}")]
    Codec(#[from] rowdb_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An entity could not be converted to or from its JSON row.
    #[error("serialization error for entity {entity}: {message}")]
    Serialization {
        /// The entity type.
        entity: String,
        /// Description of the failure.
        message: String,
    },

    /// `save` was called on an entity whose identifier is already set.
    #[error("row with manual id should not be added: {id}, call replace instead")]
    ManualIdentifierNotAllowed {
        /// The entity type.
        entity: String,
        /// The identifier the caller supplied.
        id: u64,
    },

    /// No row with the identifier exists.
    #[error("row not found: id {id} in entity {entity}")]
    NotFound {
        /// The entity type searched.
        entity: String,
        /// The identifier that was not found.
        id: u64,
    },

    /// Two rows would share one identifier.
    #[error("duplicate identifier {id} in entity {entity}")]
    DuplicateIdentifier {
        /// The entity type.
        entity: String,
        /// The repeated identifier.
        id: u64,
    },

    /// The entity type has no registered metadata.
    #[error("unknown entity: {name}")]
    UnknownEntity {
        /// Name of the entity type.
        name: String,
    },

    /// The operation needs an identifier but the entity has none.
    #[error("entity {entity} has no value for identifier field {id_field}")]
    MissingIdentifier {
        /// The entity type.
        entity: String,
        /// The identifier field name.
        id_field: String,
    },

    /// The identifier field holds something other than a non-negative integer.
    #[error("invalid identifier for entity {entity}: {value}")]
    InvalidIdentifier {
        /// The entity type.
        entity: String,
        /// The offending value, rendered as JSON.
        value: String,
    },

    /// Entity metadata is inconsistent.
    #[error("invalid metadata for entity {entity}: {message}")]
    InvalidMetadata {
        /// The entity type.
        entity: String,
        /// Description of the problem.
        message: String,
    },

    /// A table file does not satisfy the table invariants.
    #[error("invalid table format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// The data directory is locked by another engine.
    #[error("database locked: another process has exclusive access")]
    DatabaseLocked,

    /// The database has been destroyed.
    #[error("database is closed")]
    DatabaseClosed,
}

impl CoreError {
    /// Creates an unknown entity error.
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }

    /// Creates a not found error.
    pub fn not_found(entity: impl Into<String>, id: u64) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Creates a duplicate identifier error.
    pub fn duplicate_identifier(entity: impl Into<String>, id: u64) -> Self {
        Self::DuplicateIdentifier {
            entity: entity.into(),
            id,
        }
    }

    /// Creates an invalid metadata error.
    pub fn invalid_metadata(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Returns whether the storage write behind this error replaced the file.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_committed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_identifier_message_names_id_and_replace() {
        let err = CoreError::ManualIdentifierNotAllowed {
            entity: "User".into(),
            id: 2,
        };
        assert_eq!(
            err.to_string(),
            "row with manual id should not be added: 2, call replace instead"
        );
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::not_found("User", 7);
        assert_eq!(err.to_string(), "row not found: id 7 in entity User");
    }

    #[test]
    fn storage_errors_convert() {
        let err: CoreError = rowdb_storage::StorageError::InvalidName { name: "..".into() }.into();
        assert!(matches!(err, CoreError::Storage(_)));
    }
}
