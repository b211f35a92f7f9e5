//! A single stored row.

use crate::entity::EntityMetadata;
use crate::error::{CoreError, CoreResult};
use rowdb_codec::{Map, RowObject, Value};

/// One persisted row: its identifier plus its field values in on-disk order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: u64,
    values: Map<String, Value>,
}

impl Row {
    /// Creates a row from an identifier and already ordered values.
    ///
    /// `values` must not contain the identifier field.
    #[must_use]
    pub fn new(id: u64, values: Map<String, Value>) -> Self {
        Self { id, values }
    }

    /// Returns the row identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the non-identifier values in on-disk order.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns one field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Builds the JSON object for this row, identifier first.
    #[must_use]
    pub fn to_object(&self, id_field: &str) -> RowObject {
        let mut object = Map::with_capacity(self.values.len() + 1);
        object.insert(id_field.to_string(), Value::from(self.id));
        for (key, value) in &self.values {
            object.insert(key.clone(), value.clone());
        }
        object
    }

    /// Parses a JSON object that must carry an identifier.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` if the identifier is absent or `null`, and
    /// `InvalidIdentifier` if it is not a non-negative integer.
    pub fn from_object(entity: &str, meta: &EntityMetadata, object: RowObject) -> CoreResult<Self> {
        match split_object(entity, meta, object)? {
            (Some(id), values) => Ok(Self::new(id, values)),
            (None, _) => Err(CoreError::MissingIdentifier {
                entity: entity.to_string(),
                id_field: meta.id_field_name().to_string(),
            }),
        }
    }
}

/// Separates the identifier from the other values of an entity object.
///
/// The returned values hold declared fields in declared order, followed by
/// any undeclared keys in their original order. A missing or `null`
/// identifier yields `None`.
///
/// # Errors
///
/// Returns `InvalidIdentifier` if the identifier is present but is not a
/// non-negative integer below `u64::MAX`.
pub fn split_object(
    entity: &str,
    meta: &EntityMetadata,
    object: RowObject,
) -> CoreResult<(Option<u64>, Map<String, Value>)> {
    let mut id = None;
    let mut rest = Map::with_capacity(object.len());

    for (key, value) in object {
        if key == meta.id_field_name() {
            id = parse_id(entity, &value)?;
        } else {
            rest.insert(key, value);
        }
    }

    let mut values = Map::with_capacity(rest.len());
    for field in meta.field_names() {
        if let Some(value) = rest.get(field) {
            values.insert(field.clone(), value.clone());
        }
    }
    for (key, value) in rest {
        if !meta.declares(&key) {
            values.insert(key, value);
        }
    }

    Ok((id, values))
}

fn parse_id(entity: &str, value: &Value) -> CoreResult<Option<u64>> {
    match value {
        Value::Null => Ok(None),
        // Stored ids stay below u64::MAX.
        Value::Number(n) => n
            .as_u64()
            .filter(|&id| id < u64::MAX)
            .map(Some)
            .ok_or_else(|| CoreError::InvalidIdentifier {
                entity: entity.to_string(),
                value: value.to_string(),
            }),
        other => Err(CoreError::InvalidIdentifier {
            entity: entity.to_string(),
            value: other.to_string(),
        }),
    }
}
