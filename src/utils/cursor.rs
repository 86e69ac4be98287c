//! Opaque pagination cursors.
//!
//! A cursor is the base64 of `user:<id>`; clients treat it as opaque and
//! hand it back through the `after` argument.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{AppError, AppResult};

const CURSOR_PREFIX: &str = "user:";

/// Encodes a user id into an opaque cursor.
pub fn encode_cursor(id: i32) -> String {
    URL_SAFE_NO_PAD.encode(format!("{CURSOR_PREFIX}{id}"))
}

/// Decodes a cursor back into the user id it was minted from.
pub fn decode_cursor(cursor: &str) -> AppResult<i32> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| AppError::validation("after", "malformed cursor"))?;
    let text =
        String::from_utf8(bytes).map_err(|_| AppError::validation("after", "malformed cursor"))?;

    text.strip_prefix(CURSOR_PREFIX)
        .and_then(|rest| rest.parse().ok())
        .ok_or_else(|| AppError::validation("after", "malformed cursor"))
}
