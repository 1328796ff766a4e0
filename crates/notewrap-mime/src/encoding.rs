//! MIME encoding and decoding utilities.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 header encoding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Maximum line length for encoded bodies (RFC 2045).
const MAX_LINE_LENGTH: usize = 76;

/// Maximum number of raw bytes carried by one RFC 2047 encoded word.
///
/// 39 bytes become 52 Base64 characters, so a `utf-8` word is 64 columns
/// and fits on a folded header line.
const ENCODED_WORD_CHUNK: usize = 39;

/// Longest run without spaces that a header value may carry verbatim.
/// Longer runs could not be folded, so the value is encoded instead.
const MAX_PLAIN_WORD: usize = 64;

/// Encodes data as Base64 on a single line.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 wrapped at 76 columns with CRLF line breaks.
#[must_use]
pub fn encode_base64_lines(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    // Base64 output is pure ASCII, so byte chunks are valid char boundaries.
    for (i, chunk) in encoded.as_bytes().chunks(MAX_LINE_LENGTH).enumerate() {
        if i > 0 {
            result.push_str("\r\n");
        }
        result.extend(chunk.iter().map(|&b| b as char));
    }

    result
}

/// Decodes Base64 data, ignoring embedded whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Encodes bytes using Quoted-Printable encoding (RFC 2045).
///
/// Every byte outside printable ASCII is escaped, including line breaks, so
/// decoding reproduces the input exactly. Lines are kept within 76 columns
/// with soft line breaks.
#[must_use]
pub fn encode_quoted_printable(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len());
    let mut line_length = 0;

    for (i, &byte) in data.iter().enumerate() {
        let is_last = i + 1 == data.len();
        let literal = match byte {
            b'!'..=b'<' | b'>'..=b'~' => true,
            // Whitespace at the very end would be trailing whitespace.
            b' ' | b'\t' => !is_last,
            _ => false,
        };
        let width = if literal { 1 } else { 3 };

        // Leave room for the '=' of a soft line break.
        if line_length + width > MAX_LINE_LENGTH - 1 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        if literal {
            result.push(byte as char);
        } else {
            let _ = write!(result, "={byte:02X}");
        }
        line_length += width;
    }

    result
}

/// Decodes Quoted-Printable text (RFC 2045) into raw bytes.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable_bytes(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if byte != b'=' {
            result.push(byte);
            i += 1;
            continue;
        }

        // Soft line break, possibly preceded by transport padding
        let rest = &bytes[i + 1..];
        let padding = rest
            .iter()
            .take_while(|b| **b == b' ' || **b == b'\t')
            .count();
        match rest.get(padding) {
            Some(b'\r') if rest.get(padding + 1) == Some(&b'\n') => {
                i += padding + 3;
                continue;
            }
            Some(b'\n') => {
                i += padding + 2;
                continue;
            }
            None => break,
            _ => {}
        }

        // Hex encoded byte
        match rest.get(..2) {
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                result.push((hex_value(*hi) << 4) | hex_value(*lo));
                i += 3;
            }
            Some(_) => {
                return Err(Error::InvalidEncoding(format!(
                    "Invalid hex escape at offset {i}"
                )));
            }
            None => {
                return Err(Error::InvalidEncoding(
                    "Incomplete escape sequence".to_string(),
                ));
            }
        }
    }

    Ok(result)
}

/// Decodes Quoted-Printable text (RFC 2045) into a UTF-8 string.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences or the
/// decoded bytes are not valid UTF-8.
pub fn decode_quoted_printable(text: &str) -> Result<String> {
    let decoded = decode_quoted_printable_bytes(text)?;
    String::from_utf8(decoded).map_err(Into::into)
}

/// Decodes `%XX` escapes (RFC 2231 extended parameter values).
///
/// A `%` not followed by two hex digits is kept literally.
pub(crate) fn decode_percent(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some([hi, lo]) = bytes.get(i + 1..i + 3)
            && hi.is_ascii_hexdigit()
            && lo.is_ascii_hexdigit()
        {
            result.push((hex_value(*hi) << 4) | hex_value(*lo));
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    result
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Returns true if a header value cannot be written verbatim.
fn needs_rfc2047(text: &str) -> bool {
    text.chars()
        .any(|c| !c.is_ascii() || c.is_ascii_control() || c == '=' || c == '?')
        || text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains("  ")
        || text.split(' ').any(|word| word.len() > MAX_PLAIN_WORD)
}

/// Encodes a header value using RFC 2047 encoding.
///
/// Format: `=?charset?encoding?encoded-text?=`
///
/// Plain ASCII values made of short words are returned unchanged. Encoded
/// values are split into several encoded words separated by a space, which
/// header folding may turn into line breaks; chunks never split a UTF-8
/// character.
///
/// # Arguments
///
/// * `text` - Text to encode
/// * `charset` - Character set (e.g., "utf-8")
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if !needs_rfc2047(text) {
        return text.to_string();
    }

    let mut words = Vec::new();
    let mut chunk_start = 0;
    for (idx, ch) in text.char_indices() {
        if idx + ch.len_utf8() - chunk_start > ENCODED_WORD_CHUNK {
            words.push(&text[chunk_start..idx]);
            chunk_start = idx;
        }
    }
    words.push(&text[chunk_start..]);

    words
        .into_iter()
        .map(|word| format!("=?{charset}?B?{}?=", encode_base64(word.as_bytes())))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes RFC 2047 encoded words inside a header value.
///
/// Unencoded text is passed through. Whitespace between two adjacent
/// encoded words is dropped, as RFC 2047 section 6.2 requires.
///
/// # Errors
///
/// Returns an error if an encoded word uses an unknown encoding or carries
/// an invalid payload.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);
        if let Some((decoded, consumed)) = parse_encoded_word(candidate)? {
            if !(after_word && before.chars().all(char::is_whitespace)) {
                result.push_str(before);
            }
            result.push_str(&decoded);
            rest = &candidate[consumed..];
            after_word = true;
        } else {
            result.push_str(before);
            result.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
        }
    }

    result.push_str(rest);
    Ok(result)
}

/// Parses one encoded word at the start of `s`.
///
/// Returns the decoded text and the number of bytes consumed, or `None` if
/// `s` does not start with a well-formed encoded word.
fn parse_encoded_word(s: &str) -> Result<Option<(String, usize)>> {
    let inner = &s[2..];
    let Some(charset_end) = inner.find('?') else {
        return Ok(None);
    };
    let charset = &inner[..charset_end];
    let after_charset = &inner[charset_end + 1..];
    let Some(encoding_end) = after_charset.find('?') else {
        return Ok(None);
    };
    let encoding = &after_charset[..encoding_end];
    let payload_area = &after_charset[encoding_end + 1..];
    let Some(payload_end) = payload_area.find("?=") else {
        return Ok(None);
    };
    let payload = &payload_area[..payload_end];

    if charset.is_empty() || encoding.len() != 1 || payload.contains(char::is_whitespace) {
        return Ok(None);
    }

    let bytes = match encoding.to_ascii_uppercase().as_str() {
        "B" => decode_base64(payload)?,
        // Quoted-Printable with underscore for space
        "Q" => decode_quoted_printable_bytes(&payload.replace('_', " "))?,
        other => {
            return Err(Error::InvalidEncoding(format!("Unknown encoding: {other}")));
        }
    };

    let consumed = 2 + charset_end + 1 + encoding_end + 1 + payload_end + 2;
    Ok(Some((decode_charset(charset, bytes)?, consumed)))
}

/// Converts bytes in the named charset to a string.
///
/// UTF-8, US-ASCII and ISO-8859-1 are supported; other charsets are decoded
/// lossily as UTF-8.
///
/// # Errors
///
/// Returns an error if UTF-8 or US-ASCII input is not valid UTF-8.
pub fn decode_charset(charset: &str, bytes: Vec<u8>) -> Result<String> {
    // RFC 2231 allows a language suffix: utf-8*en
    let charset = charset.split('*').next().unwrap_or(charset);

    match charset.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" | "us-ascii" | "ascii" => String::from_utf8(bytes).map_err(Into::into),
        "iso-8859-1" | "latin1" | "latin-1" => Ok(bytes.into_iter().map(char::from).collect()),
        other => {
            tracing::warn!(charset = other, "Unsupported charset, decoding lossily");
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
