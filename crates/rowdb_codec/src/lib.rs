//! # RowDB Codec
//!
//! The on-disk JSON document format for RowDB tables.
//!
//! Every entity type is stored as one document:
//!
//! ```text
//! {
//!   "idGenerator": <integer>,
//!   "rows": [ { "<id field>": <integer>, "<field>": <value>, ... }, ... ]
//! }
//! ```
//!
//! ## Format Rules
//!
//! - UTF-8, two-space indentation, no trailing newline
//! - `idGenerator` precedes `rows`
//! - Key order inside each row is preserved as given (the engine puts the
//!   identifier first, then declared fields in declared order)
//! - Identical documents encode to identical bytes
//!
//! ## Usage
//!
//! ```
//! use rowdb_codec::{decode_document, encode_document, TableDocument};
//!
//! let doc = TableDocument::empty(1);
//! let bytes = encode_document(&doc).unwrap();
//! assert_eq!(bytes, b"{\n  \"idGenerator\": 1,\n  \"rows\": []\n}");
//!
//! let decoded = decode_document(&bytes).unwrap();
//! assert_eq!(doc, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;

pub use document::{decode_document, encode_document, RowObject, TableDocument};
pub use error::{CodecError, CodecResult};

/// Re-exported JSON value types used in row objects.
pub use serde_json::{Map, Value};
