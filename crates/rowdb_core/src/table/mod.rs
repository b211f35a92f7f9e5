//! In-memory row tables and their persisted image.
//!
//! A [`TableState`] pairs one entity type's [`RowTable`] with its
//! [`IdGenerator`](crate::entity::IdGenerator) and converts both to and from the
//! on-disk [`TableDocument`](rowdb_codec::TableDocument).

mod row;
mod rows;
mod state;

pub use row::{split_object, Row};
pub use rows::RowTable;
pub use state::TableState;
