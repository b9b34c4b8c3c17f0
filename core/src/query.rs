//! Query-string parsing and percent-decoding helpers.
//!
//! Neither helper touches the network. `parse_query_string_to_map` never
//! fails: malformed pairs are skipped. Decoding comes in two flavours:
//! `try_decode_url` reports failures, while `decode_url` returns `None` for a
//! bad escape and substitutes U+FFFD for invalid UTF-8.

use std::collections::HashMap;

use crate::error::{FacadeError, Result};

/// Collect the `key=value` pairs after the first `?` of `url`.
///
/// A pair is kept only when it contains exactly one `=`. Keys and values are
/// returned as written, without percent-decoding. When a key repeats, the
/// last occurrence wins.
pub fn parse_query_string_to_map(url: &str) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    let Some((_, query)) = url.split_once('?') else {
        return pairs;
    };
    for param in query.split('&') {
        let mut parts = param.split('=');
        if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
            pairs.insert(key.to_string(), value.to_string());
        }
    }
    pairs
}

/// Percent-decode `input` as UTF-8, treating `+` as a space.
///
/// Returns `None` when the input has a truncated or non-hex escape. Decoded
/// bytes that are not valid UTF-8 become U+FFFD replacement characters. Use
/// `try_decode_url` to reject them instead.
pub fn decode_url(input: &str) -> Option<String> {
    match percent_decode(input) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            tracing::trace!(error = %err, "url decode failed");
            None
        }
    }
}

/// Percent-decode `input` as UTF-8, treating `+` as a space. Fails on a bad
/// escape and on decoded bytes that are not valid UTF-8.
pub fn try_decode_url(input: &str) -> Result<String> {
    let bytes = percent_decode(input)?;
    String::from_utf8(bytes).map_err(|e| decode_error(input, e.to_string()))
}

fn percent_decode(input: &str) -> Result<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' => {
                let escape = bytes
                    .get(i + 1..i + 3)
                    .ok_or_else(|| decode_error(input, format!("incomplete escape at byte {i}")))?;
                match (hex_value(escape[0]), hex_value(escape[1])) {
                    (Some(high), Some(low)) => decoded.push((high << 4) | low),
                    _ => return Err(decode_error(input, format!("invalid escape at byte {i}"))),
                }
                i += 3;
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }
    Ok(decoded)
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|digit| digit as u8)
}

fn decode_error(input: &str, reason: String) -> FacadeError {
    FacadeError::Decode {
        input: input.to_string(),
        reason,
    }
}
