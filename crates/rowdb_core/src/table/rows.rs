//! Ordered row collection for one entity type.

use crate::error::{CoreError, CoreResult};
use crate::table::row::Row;

/// Rows of one entity type in insertion order.
///
/// # Invariants
///
/// - No two rows share an identifier
/// - Order is insertion order; updates keep a row's position
#[derive(Debug, Clone, PartialEq)]
pub struct RowTable {
    entity: String,
    rows: Vec<Row>,
}

impl RowTable {
    /// Creates an empty table for the named entity.
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            rows: Vec::new(),
        }
    }

    /// Returns the entity name used in error messages.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Appends a row at the end.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if a row with the same identifier exists.
    pub fn insert(&mut self, row: Row) -> CoreResult<()> {
        if self.position(row.id()).is_some() {
            return Err(CoreError::duplicate_identifier(&self.entity, row.id()));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns a copy of all rows in insertion order.
    #[must_use]
    pub fn find_all(&self) -> Vec<Row> {
        self.rows.clone()
    }

    /// Returns the row with the given identifier.
    #[must_use]
    pub fn find_one(&self, id: u64) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Replaces the row with the same identifier in place.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no row has that identifier.
    pub fn update(&mut self, row: Row) -> CoreResult<()> {
        match self.position(row.id()) {
            Some(index) => {
                self.rows[index] = row;
                Ok(())
            }
            None => Err(CoreError::not_found(&self.entity, row.id())),
        }
    }

    /// Overwrites the row with the same identifier in place, or appends it.
    ///
    /// Returns `true` if an existing row was overwritten.
    pub fn upsert(&mut self, row: Row) -> bool {
        match self.position(row.id()) {
            Some(index) => {
                self.rows[index] = row;
                true
            }
            None => {
                self.rows.push(row);
                false
            }
        }
    }

    /// Removes the row with the given identifier, if present.
    ///
    /// Removing an absent identifier is a no-op.
    pub fn remove(&mut self, id: u64) -> Option<Row> {
        self.position(id).map(|index| self.rows.remove(index))
    }

    /// Returns whether a row has the given identifier.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    /// Returns the largest identifier in the table.
    #[must_use]
    pub fn max_id(&self) -> Option<u64> {
        self.rows.iter().map(Row::id).max()
    }

    /// Iterates over rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }
}
