//! Table document encoding and decoding.

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row as stored on disk: an ordered JSON object.
pub type RowObject = Map<String, Value>;

/// The persisted image of one entity type's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDocument {
    /// Next identifier the generator will hand out.
    pub id_generator: u64,
    /// Rows in insertion order.
    pub rows: Vec<RowObject>,
}

impl TableDocument {
    /// Creates a document with no rows.
    #[must_use]
    pub fn empty(id_generator: u64) -> Self {
        Self {
            id_generator,
            rows: Vec::new(),
        }
    }
}

/// Encodes a document as pretty-printed JSON with two-space indentation.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if a value cannot be represented
/// in JSON.
pub fn encode_document(doc: &TableDocument) -> CodecResult<Vec<u8>> {
    serde_json::to_vec_pretty(doc).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Decodes a document, preserving the key order of every row.
///
/// # Errors
///
/// Returns [`CodecError::InvalidUtf8`] for non UTF-8 input and
/// [`CodecError::DecodingFailed`] for malformed JSON or a wrong shape
/// (missing `idGenerator`, non-object rows, negative generator).
pub fn decode_document(bytes: &[u8]) -> CodecResult<TableDocument> {
    let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
    Ok(serde_json::from_str(text)?)
}
