//! Cursor codec
//!
//! A [`TableCursor`] is persisted as the base64 form of its wire encoding,
//! the same codec the upstream server uses. The base64 string is the only
//! shape that leaves the sync core, in `STATE` messages and state files.

use crate::error::{Error, Result};
use crate::state::SerializedCursor;
use crate::upstream::TableCursor;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use prost::Message;

/// Encode a table cursor into its persisted form
pub fn encode(cursor: &TableCursor) -> SerializedCursor {
    SerializedCursor {
        cursor: STANDARD.encode(cursor.encode_to_vec()),
    }
}

/// Decode a persisted cursor back into a table cursor
pub fn decode(serialized: &SerializedCursor) -> Result<TableCursor> {
    let bytes = STANDARD
        .decode(&serialized.cursor)
        .map_err(|e| Error::cursor_decode(format!("invalid base64: {e}")))?;

    TableCursor::decode(bytes.as_slice())
        .map_err(|e| Error::cursor_decode(format!("invalid cursor payload: {e}")))
}
