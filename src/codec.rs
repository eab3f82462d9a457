//! Base64 text codec: standard alphabet, `=` padding, MIME-style line wrapping.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{DecodeFailure, Result};

/// Encoded output is wrapped after this many characters.
pub const LINE_WIDTH: usize = 76;

/// Encode text as padded standard Base64, wrapped at `LINE_WIDTH` columns.
pub fn encode(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / LINE_WIDTH);
    for (i, chunk) in encoded.as_bytes().chunks(LINE_WIDTH).enumerate() {
        if i > 0 {
            wrapped.push('\n');
        }
        // Base64 output is pure ASCII
        wrapped.push_str(std::str::from_utf8(chunk).unwrap_or_default());
    }
    wrapped.trim().to_string()
}

/// Decode Base64 back to text.
///
/// ASCII whitespace is ignored so wrapped output decodes. Anything else outside
/// the standard alphabet, or bad padding, is a `DecodeFailure::Base64`; bytes
/// that are not UTF-8 are a `DecodeFailure::Utf8`.
pub fn decode(text: &str) -> Result<String> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(DecodeFailure::Base64)?;
    let decoded = String::from_utf8(bytes).map_err(DecodeFailure::Utf8)?;
    Ok(decoded)
}
