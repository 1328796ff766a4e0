//! MIME header handling.

use crate::encoding::{decode_rfc2047, encode_rfc2047};
use crate::error::{Error, Result};
use std::fmt;

/// Collection of email headers.
///
/// Names are matched case-insensitively but written back as given, and
/// headers keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Sets a header value, replacing any existing values.
    ///
    /// The header keeps the position of its first occurrence.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        if let Some(pos) = self.position(&name) {
            self.headers[pos] = (name.clone(), value);
            let mut index = 0;
            self.headers.retain(|(n, _)| {
                let keep = index <= pos || !n.eq_ignore_ascii_case(&name);
                index += 1;
                keep
            });
        } else {
            self.headers.push((name, value));
        }
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|pos| self.headers[pos].1.as_str())
    }

    /// Gets the first value for a header with RFC 2047 encoded words decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the value contains an invalid encoded word.
    pub fn get_decoded(&self, name: &str) -> Result<Option<String>> {
        self.get(name).map(Self::decode_value).transpose()
    }

    /// Checks whether a header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the number of header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns an iterator over all headers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Parses headers from raw text.
    ///
    /// Headers are in the format:
    /// ```text
    /// Header-Name: value
    /// Continuation: line
    ///   folded onto the previous header
    /// ```
    ///
    /// Parsing stops at the first empty line.
    ///
    /// # Errors
    ///
    /// Returns an error if a continuation line has no header to extend or a
    /// header name is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut headers = Self::new();
        let mut current: Option<(String, String)> = None;

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            // Check for continuation line (starts with space or tab)
            if line.starts_with(|c: char| c == ' ' || c == '\t') {
                if let Some((_, value)) = current.as_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                    continue;
                }
                return Err(Error::InvalidHeader(format!(
                    "Continuation without header: {line}"
                )));
            }

            if let Some((name, value)) = current.take() {
                headers.add(name, value.trim().to_string());
            }

            let Some((name, value)) = line.split_once(':') else {
                tracing::warn!(line, "Skipping header line without colon");
                continue;
            };
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(Error::InvalidHeader(format!("Invalid header name: {name}")));
            }
            current = Some((name.to_string(), value.trim().to_string()));
        }

        if let Some((name, value)) = current {
            headers.add(name, value.trim().to_string());
        }

        Ok(headers)
    }

    /// Encodes a header value using RFC 2047 if needed.
    #[must_use]
    pub fn encode_value(value: &str) -> String {
        encode_rfc2047(value, "utf-8")
    }

    /// Decodes a header value from RFC 2047 if encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_value(value: &str) -> Result<String> {
        decode_rfc2047(value)
    }
}

/// Lines are folded to stay within this many bytes (RFC 5322 section 2.1.1).
const MAX_LINE_LENGTH: usize = 78;

/// Byte offsets of spaces where a value may be folded.
///
/// Only a single space between two non-blank characters qualifies, so that
/// unfolding in [`Headers::parse`] restores the value exactly.
fn fold_points(value: &str) -> Vec<usize> {
    let bytes = value.as_bytes();
    (1..bytes.len().saturating_sub(1))
        .filter(|&i| {
            bytes[i] == b' '
                && !bytes[i - 1].is_ascii_whitespace()
                && !bytes[i + 1].is_ascii_whitespace()
        })
        .collect()
}

fn write_folded(f: &mut fmt::Formatter<'_>, name: &str, value: &str) -> fmt::Result {
    write!(f, "{name}: ")?;
    let mut column = name.len() + 2;
    let mut rest = value;

    while column + rest.len() > MAX_LINE_LENGTH {
        let points = fold_points(rest);
        let fitting = points
            .iter()
            .copied()
            .take_while(|&i| column + i <= MAX_LINE_LENGTH)
            .last();
        // An unbreakable run is written whole up to the next fold point.
        let Some(at) = fitting.or_else(|| points.first().copied()) else {
            break;
        };
        f.write_str(&rest[..at])?;
        f.write_str("\r\n ")?;
        rest = &rest[at + 1..];
        column = 1;
    }

    write!(f, "{rest}\r\n")
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            write_folded(f, name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_headers_set() {
        let mut headers = Headers::new();
        headers.add("Subject", "first");
        headers.add("To", "alice@example.com");
        headers.add("To", "bob@example.com");
        assert_eq!(headers.len(), 3);

        headers.set("to", "charlie@example.com");
        assert_eq!(headers.get("To"), Some("charlie@example.com"));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.iter().next(), Some(("Subject", "first")));
    }

    #[test]
    fn test_headers_display_folds_long_values() {
        let value = (0..40).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let mut headers = Headers::new();
        headers.add("Subject", value.clone());

        let text = headers.to_string();
        assert!(text.lines().count() > 1);
        assert!(text.lines().all(|line| line.len() <= MAX_LINE_LENGTH));
        assert_eq!(Headers::parse(&text).unwrap().get("Subject"), Some(value.as_str()));
    }

    #[test]
    fn test_fold_keeps_repeated_whitespace() {
        let value = format!("{}  tail\tend {}", "a".repeat(70), "b".repeat(20));
        let mut headers = Headers::new();
        headers.add("X-Test", value.clone());

        let text = headers.to_string();
        assert_eq!(Headers::parse(&text).unwrap().get("X-Test"), Some(value.as_str()));
    }

    #[test]
    fn test_unbreakable_value_is_written_whole() {
        let value = "x".repeat(100);
        let mut headers = Headers::new();
        headers.add("X-Long", value.clone());
        assert_eq!(headers.to_string(), format!("X-Long: {value}\r\n"));
    }

    #[test]
    fn test_headers_parse() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: Test Message\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8\r\n",
            "\r\n",
            "Body: not a header\r\n"
        );

        let headers = Headers::parse(text).unwrap();
        assert_eq!(headers.get("From"), Some("sender@example.com"));
        assert_eq!(headers.get("To"), Some("recipient@example.com"));
        assert_eq!(headers.get("Subject"), Some("Test Message"));
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
        assert!(!headers.contains("Body"));
    }

    #[test]
    fn test_headers_parse_rejects_garbage() {
        assert!(Headers::parse(" leading continuation\r\n").is_err());
        assert!(Headers::parse("Bad Name: value\r\n").is_err());
    }

    #[test]
    fn test_headers_parse_skips_lines_without_colon() {
        let headers = Headers::parse("From sender Mon Jan 1\r\nSubject: x\r\n").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("subject"), Some("x"));
    }

    #[test]
    fn test_headers_display_preserves_order_and_case() {
        let mut headers = Headers::new();
        headers.add("MIME-Version", "1.0");
        headers.add("from", "sender@example.com");

        assert_eq!(
            headers.to_string(),
            "MIME-Version: 1.0\r\nfrom: sender@example.com\r\n"
        );
    }

    #[test]
    fn test_headers_get_decoded() {
        let mut headers = Headers::new();
        headers.add("Subject", Headers::encode_value("Grüße"));
        assert_eq!(
            headers.get_decoded("subject").unwrap().as_deref(),
            Some("Grüße")
        );
        assert_eq!(headers.get_decoded("missing").unwrap(), None);
    }

    #[test]
    fn test_headers_iter() {
        let mut headers = Headers::new();
        headers.add("From", "sender@example.com");
        headers.add("To", "recipient@example.com");

        let mut count = 0;
        for (name, value) in headers.iter() {
            assert!(!name.is_empty());
            assert!(!value.is_empty());
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
