//! Reversible, non-cryptographic encoding of the stored key.

use base64::Engine;

/// Encodes a key for storage.
pub fn obfuscate(key: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(key.as_bytes())
}

/// Decodes a stored record.
///
/// Records that are not valid base64 or do not decode to UTF-8 are returned
/// unchanged, so a hand-edited or legacy plain-text record still works.
pub fn deobfuscate(record: &str) -> String {
    base64::engine::general_purpose::STANDARD
        .decode(record.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| record.to_string())
}
