//! One entity type's generator and rows, and their document form.

use crate::entity::{EntityMetadata, IdGenerator};
use crate::error::{CoreError, CoreResult};
use crate::table::row::Row;
use crate::table::rows::RowTable;
use rowdb_codec::TableDocument;
use tracing::warn;

/// The authoritative in-memory state of one entity type.
///
/// # Invariants
///
/// - Every row identifier is strictly less than `generator.current()`
/// - No two rows share an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// Identifier generator for new rows.
    pub generator: IdGenerator,
    /// Rows in insertion order.
    pub rows: RowTable,
}

impl TableState {
    /// Creates an empty state whose first identifier is `initial_id`.
    #[must_use]
    pub fn empty(entity: &str, initial_id: u64) -> Self {
        Self {
            generator: IdGenerator::starting_at(initial_id),
            rows: RowTable::new(entity),
        }
    }

    /// Rebuilds the state from a decoded table document.
    ///
    /// A persisted generator that does not exceed every stored identifier is
    /// raised to `max_id + 1`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if a row lacks a valid identifier and
    /// `DuplicateIdentifier` if two rows share one.
    pub fn from_document(
        entity: &str,
        meta: &EntityMetadata,
        doc: TableDocument,
    ) -> CoreResult<Self> {
        let mut rows = RowTable::new(entity);

        for (index, object) in doc.rows.into_iter().enumerate() {
            let row = Row::from_object(entity, meta, object).map_err(|e| match e {
                CoreError::MissingIdentifier { .. } | CoreError::InvalidIdentifier { .. } => {
                    CoreError::invalid_format(format!("{entity}: row {index}: {e}"))
                }
                other => other,
            })?;
            rows.insert(row)?;
        }

        let mut generator = IdGenerator::starting_at(doc.id_generator);
        if let Some(max_id) = rows.max_id() {
            if generator.observe(max_id) {
                warn!(
                    entity,
                    persisted = doc.id_generator,
                    repaired = generator.current(),
                    "idGenerator behind stored rows, raised"
                );
            }
        }

        Ok(Self { generator, rows })
    }

    /// Builds the document to persist.
    #[must_use]
    pub fn to_document(&self, meta: &EntityMetadata) -> TableDocument {
        TableDocument {
            id_generator: self.generator.current(),
            rows: self
                .rows
                .iter()
                .map(|row| row.to_object(meta.id_field_name()))
                .collect(),
        }
    }
}
