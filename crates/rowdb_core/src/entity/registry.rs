//! Entity metadata registry.

use crate::entity::metadata::{Entity, EntityMetadata};
use crate::error::{CoreError, CoreResult};
use std::collections::{BTreeMap, HashSet};

/// The static table of known entity types.
///
/// Built once before the database opens; the database never learns about
/// entity types after that.
///
/// # Example
///
/// ```rust
/// use rowdb_core::{EntityMetadata, EntityRegistry};
///
/// let registry = EntityRegistry::new()
///     .register_metadata("User", EntityMetadata::new("User").fields(["username", "age"]))
///     .unwrap();
///
/// assert_eq!(registry.resolve("User").unwrap().filename(), "User");
/// assert!(registry.resolve("Order").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: BTreeMap<String, EntityMetadata>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an [`Entity`] type under [`Entity::NAME`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidMetadata` if the metadata is inconsistent or collides
    /// with an already registered entity.
    pub fn register<T: Entity>(self) -> CoreResult<Self> {
        self.register_metadata(T::NAME, T::metadata())
    }

    /// Registers metadata under an explicit entity name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMetadata` if:
    /// - The name is already registered
    /// - The filename is empty, not a plain file name, or used by another entity
    /// - The identifier field is empty or also listed as a field
    /// - A field is empty or listed twice
    pub fn register_metadata(
        mut self,
        name: impl Into<String>,
        metadata: EntityMetadata,
    ) -> CoreResult<Self> {
        let name = name.into();

        if self.entries.contains_key(&name) {
            return Err(CoreError::invalid_metadata(&name, "entity already registered"));
        }
        if rowdb_storage::validate_name(metadata.filename()).is_err() {
            return Err(CoreError::invalid_metadata(
                &name,
                format!("invalid filename {:?}", metadata.filename()),
            ));
        }
        if let Some((other, _)) = self
            .entries
            .iter()
            .find(|(_, m)| m.filename() == metadata.filename())
        {
            return Err(CoreError::invalid_metadata(
                &name,
                format!("filename {:?} already used by {other}", metadata.filename()),
            ));
        }
        if metadata.id_field_name().is_empty() {
            return Err(CoreError::invalid_metadata(&name, "empty identifier field"));
        }

        let mut seen = HashSet::new();
        for field in metadata.field_names() {
            if field.is_empty() {
                return Err(CoreError::invalid_metadata(&name, "empty field name"));
            }
            if field == metadata.id_field_name() {
                return Err(CoreError::invalid_metadata(
                    &name,
                    format!("identifier field {field:?} listed as a field"),
                ));
            }
            if !seen.insert(field.as_str()) {
                return Err(CoreError::invalid_metadata(
                    &name,
                    format!("field {field:?} listed twice"),
                ));
            }
        }

        self.entries.insert(name, metadata);
        Ok(self)
    }

    /// Looks up the metadata for an entity name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the name was never registered.
    pub fn resolve(&self, name: &str) -> CoreResult<&EntityMetadata> {
        self.entries
            .get(name)
            .ok_or_else(|| CoreError::unknown_entity(name))
    }

    /// Returns whether the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over registered entities in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityMetadata)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no entity is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Note {
        key: Option<u64>,
        text: String,
    }

    impl Entity for Note {
        const NAME: &'static str = "Note";

        fn metadata() -> EntityMetadata {
            EntityMetadata::new("notes").id_field("key").field("text")
        }
    }

    fn user_meta() -> EntityMetadata {
        EntityMetadata::new("User").fields(["username", "age"])
    }

    #[test]
    fn register_typed_entity() {
        let registry = EntityRegistry::new().register::<Note>().unwrap();

        let meta = registry.resolve("Note").unwrap();
        assert_eq!(meta.filename(), "notes");
        assert_eq!(meta.id_field_name(), "key");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolve_unknown_fails() {
        let registry = EntityRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve("User"),
            Err(CoreError::UnknownEntity { name }) if name == "User"
        ));
    }

    #[test]
    fn duplicate_name_rejected() {
        let result = EntityRegistry::new()
            .register_metadata("User", user_meta())
            .unwrap()
            .register_metadata("User", EntityMetadata::new("Other"));
        assert!(matches!(result, Err(CoreError::InvalidMetadata { .. })));
    }

    #[test]
    fn shared_filename_rejected() {
        let result = EntityRegistry::new()
            .register_metadata("User", user_meta())
            .unwrap()
            .register_metadata("Admin", EntityMetadata::new("User"));
        assert!(matches!(result, Err(CoreError::InvalidMetadata { .. })));
    }

    #[test]
    fn bad_filenames_rejected() {
        for filename in ["", "../User", "nested/User", ".hidden"] {
            let result = EntityRegistry::new().register_metadata("X", EntityMetadata::new(filename));
            assert!(result.is_err(), "{filename:?} should be rejected");
        }
    }

    #[test]
    fn inconsistent_fields_rejected() {
        let cases = [
            EntityMetadata::new("A").field("id"),
            EntityMetadata::new("B").fields(["name", "name"]),
            EntityMetadata::new("C").field(""),
            EntityMetadata::new("D").id_field(""),
        ];
        for meta in cases {
            assert!(EntityRegistry::new().register_metadata("X", meta).is_err());
        }
    }

    #[test]
    fn iter_in_name_order() {
        let registry = EntityRegistry::new()
            .register_metadata("User", user_meta())
            .unwrap()
            .register_metadata("Order", EntityMetadata::new("Order"))
            .unwrap();

        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Order", "User"]);
        assert!(registry.contains("Order"));
    }
}
