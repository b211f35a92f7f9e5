//! Entity types, metadata and identifier generation.

mod id;
mod metadata;
mod registry;

pub use id::IdGenerator;
pub use metadata::{Entity, EntityMetadata, DEFAULT_ID_FIELD};
pub use registry::EntityRegistry;
