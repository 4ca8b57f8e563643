#![forbid(unsafe_code)]

use crate::Error;
use serde_json::Value;
use std::path::Path;

pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decode a state document written by the client.
///
/// The client always writes a UTF-8 byte-order mark; a document without one
/// is rejected rather than guessed at.
pub fn decode_document(path: &Path, bytes: &[u8]) -> Result<Value, Error> {
    let Some(body) = bytes.strip_prefix(&UTF8_BOM) else {
        return Err(Error::MissingByteOrderMark {
            path: path.to_owned(),
            head: bytes.iter().take(10).copied().collect(),
        });
    };
    let text = std::str::from_utf8(body).map_err(|source| Error::InvalidUtf8 {
        path: path.to_owned(),
        source,
    })?;
    Ok(serde_json::from_str(text)?)
}
