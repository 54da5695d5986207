//! Base64 decoding utilities
//!
//! Descriptor payloads frequently arrive with their trailing `=` padding
//! stripped, so decoding always restores padding first and accepts both the
//! standard and URL-safe alphabets.

use anyhow::{Result, bail};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use tracing::trace;

/// Decodes a Base64 payload, restoring missing `=` padding first
///
/// Tries the standard alphabet, then the URL-safe alphabet. Whitespace in the
/// input is removed before decoding.
pub fn decode_padded(content: &str) -> Result<Vec<u8>> {
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let padded = add_base64_padding(&cleaned);
    trace!(
        "Attempting Base64 decode, padded length: {} bytes",
        padded.len()
    );

    if let Ok(decoded) = STANDARD.decode(&padded) {
        return Ok(decoded);
    }

    if let Ok(decoded) = URL_SAFE.decode(&padded) {
        trace!("Decoded using URL-safe Base64");
        return Ok(decoded);
    }

    bail!("Failed to decode Base64 payload")
}

/// Pads a Base64 string with `=` up to the next multiple of 4
pub fn add_base64_padding(s: &str) -> String {
    let mut result = s.to_string();
    while result.len() % 4 != 0 {
        result.push('=');
    }
    result
}
