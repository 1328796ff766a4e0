//! MIME message structure and handling.

use crate::content_type::{ContentDisposition, ContentType};
use crate::encoding::{
    decode_base64, decode_charset, decode_quoted_printable_bytes, encode_base64_lines,
    encode_quoted_printable,
};
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    #[default]
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }

    /// Encodes raw data for transport.
    #[must_use]
    pub fn encode(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Base64 => encode_base64_lines(data).into_bytes(),
            Self::QuotedPrintable => encode_quoted_printable(data).into_bytes(),
            Self::SevenBit | Self::EightBit | Self::Binary => data.to_vec(),
        }
    }

    /// Decodes a transport-encoded body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid for this encoding.
    pub fn decode(self, body: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => decode_base64(&String::from_utf8_lossy(body)),
            Self::QuotedPrintable => decode_quoted_printable_bytes(&String::from_utf8_lossy(body)),
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(body.to_vec()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// MIME message part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body (raw, still transfer-encoded).
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Creates a part carrying `data` encoded with `encoding`.
    ///
    /// Sets `Content-Type` and `Content-Transfer-Encoding`.
    #[must_use]
    pub fn encoded(content_type: &ContentType, data: &[u8], encoding: TransferEncoding) -> Self {
        let mut headers = Headers::new();
        headers.add("Content-Type", content_type.to_string());
        headers.add("Content-Transfer-Encoding", encoding.to_string());
        Self::new(headers, encoding.encode(data))
    }

    /// Creates a `message/external-body` part referencing `url` (RFC 2017).
    ///
    /// `inner` holds the headers describing the referenced entity, such as
    /// its `Content-Type`; they become the part body.
    #[must_use]
    pub fn external_body(url: &str, inner: &Headers) -> Self {
        let mut headers = Headers::new();
        headers.add(
            "Content-Type",
            ContentType::external_body_url(url).to_string(),
        );
        headers.add("Content-Transfer-Encoding", TransferEncoding::SevenBit.to_string());
        Self::new(headers, format!("{inner}\r\n").into_bytes())
    }

    /// Parses a part from raw bytes: a header block, an empty line, the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the header block is malformed.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let (head, body) = split_head_body(raw);
        let headers = Headers::parse(&String::from_utf8_lossy(head))?;
        Ok(Self::new(headers, body.to_vec()))
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Gets the content disposition, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be decoded.
    pub fn content_disposition(&self) -> Result<Option<ContentDisposition>> {
        self.headers
            .get("content-disposition")
            .map(ContentDisposition::parse)
            .transpose()
    }

    /// Gets the Content-ID without angle brackets.
    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        self.headers.get("content-id").map(strip_angle_brackets)
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        self.transfer_encoding().decode(&self.body)
    }

    /// Gets the decoded body as a string, honouring the `charset` parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or charset conversion fails.
    pub fn body_text(&self) -> Result<String> {
        let decoded = self.decode_body()?;
        let content_type = self.content_type()?;
        decode_charset(content_type.charset().unwrap_or("utf-8"), decoded)
    }

    /// Returns the headers of the entity a `message/external-body` part refers to.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not an external-body part or its body
    /// does not hold a valid header block.
    pub fn external_headers(&self) -> Result<Headers> {
        let content_type = self.content_type()?;
        if !content_type.is("message", "external-body") {
            return Err(Error::InvalidContentType(format!(
                "Expected message/external-body, got {}",
                content_type.mime_type()
            )));
        }
        Headers::parse(&String::from_utf8_lossy(&self.body))
    }

    /// Splits a nested `multipart/*` part into its children.
    ///
    /// # Errors
    ///
    /// Returns an error if this part is not multipart or is malformed.
    pub fn subparts(&self) -> Result<Vec<Self>> {
        let content_type = self.content_type()?;
        if !content_type.is_multipart() {
            return Err(Error::InvalidMultipart(format!(
                "{} is not a multipart type",
                content_type.mime_type()
            )));
        }
        let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
        split_multipart(&self.body, boundary)
    }
}

/// MIME message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Message parts (empty for single-part messages).
    pub parts: Vec<Part>,
    /// Body for single-part messages.
    pub body: Option<Vec<u8>>,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub const fn new(headers: Headers) -> Self {
        Self {
            headers,
            parts: Vec::new(),
            body: None,
        }
    }

    /// Creates a single-part message.
    #[must_use]
    pub const fn single_part(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            parts: Vec::new(),
            body: Some(body),
        }
    }

    /// Creates a multipart message.
    #[must_use]
    pub const fn multipart(headers: Headers, parts: Vec<Part>) -> Self {
        Self {
            headers,
            parts,
            body: None,
        }
    }

    /// Parses a raw RFC 5322 message.
    ///
    /// `multipart/*` bodies are split into [`Part`]s; preamble and epilogue
    /// are discarded. The line break that ends a single-part body is treated
    /// as framing, mirroring the line break before a multipart delimiter.
    ///
    /// # Errors
    ///
    /// Returns an error if headers are malformed, the content type is
    /// invalid, or a multipart body has no usable boundary.
    pub fn parse(raw: impl AsRef<[u8]>) -> Result<Self> {
        let (head, body) = split_head_body(raw.as_ref());
        let headers = Headers::parse(&String::from_utf8_lossy(head))?;
        let message = Self::new(headers);

        let content_type = message.content_type()?;
        if content_type.is_multipart() {
            let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
            let parts = split_multipart(body, boundary)?;
            tracing::trace!(parts = parts.len(), "Parsed multipart message");
            return Ok(Self::multipart(message.headers, parts));
        }

        let body = strip_trailing_line_break(body);
        Ok(Self::single_part(message.headers, body.to_vec()))
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Checks if this is a multipart message.
    ///
    /// # Errors
    ///
    /// Returns an error if content type cannot be determined.
    pub fn is_multipart(&self) -> Result<bool> {
        Ok(self.content_type()?.is_multipart())
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Gets the Message-ID header without angle brackets.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id").map(strip_angle_brackets)
    }

    /// Returns the body of a single-part message as a [`Part`].
    ///
    /// The part carries the message's `Content-*` headers so it decodes the
    /// same way as a part of a multipart message. Returns `None` for
    /// multipart messages.
    #[must_use]
    pub fn body_part(&self) -> Option<Part> {
        let body = self.body.as_ref()?;
        let mut headers = Headers::new();
        for (name, value) in self.headers.iter() {
            if name.get(..8).is_some_and(|p| p.eq_ignore_ascii_case("content-")) {
                headers.add(name, value);
            }
        }
        Some(Part::new(headers, body.clone()))
    }

    /// Gets the body as text for single-part messages.
    ///
    /// # Errors
    ///
    /// Returns an error if this is a multipart message or decoding fails.
    pub fn body_text(&self) -> Result<String> {
        if !self.parts.is_empty() {
            return Err(Error::InvalidMultipart(
                "Use parts for multipart messages".to_string(),
            ));
        }

        self.body_part()
            .ok_or(Error::MissingBody)?
            .body_text()
    }

    /// Serializes the message to raw bytes with CRLF line endings.
    ///
    /// # Errors
    ///
    /// Returns an error if a multipart message has no boundary.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.headers.to_string().into_bytes();
        out.extend_from_slice(b"\r\n");

        if let Some(body) = &self.body {
            out.extend_from_slice(body);
            out.extend_from_slice(b"\r\n");
            return Ok(out);
        }

        let content_type = self.content_type()?;
        let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
        for part in &self.parts {
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            out.extend_from_slice(part.headers.to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&part.body);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Ok(out)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes().map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

/// Builder for [`Message`].
///
/// One part produces a single-part message whose `Content-*` headers are
/// lifted to the top level; more parts produce `multipart/mixed`.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    headers: Headers,
    parts: Vec<Part>,
    boundary: Option<String>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw header. The value is written verbatim.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Sets the From header, encoding it if needed.
    #[must_use]
    pub fn from(self, from: &str) -> Self {
        self.header("From", Headers::encode_value(from))
    }

    /// Sets the Subject header, encoding it if needed.
    #[must_use]
    pub fn subject(self, subject: &str) -> Self {
        self.header("Subject", Headers::encode_value(subject))
    }

    /// Sets the Message-ID header.
    #[must_use]
    pub fn message_id(self, id: &str) -> Self {
        self.header("Message-ID", format!("<{id}>"))
    }

    /// Appends a body part.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Uses a fixed multipart boundary instead of a generated one.
    #[must_use]
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if no part was added.
    pub fn build(self) -> Result<Message> {
        let mut headers = Headers::new();
        headers.add("MIME-Version", "1.0");
        for (name, value) in self.headers.iter() {
            headers.add(name, value);
        }

        let mut parts = self.parts;
        match parts.len() {
            0 => Err(Error::InvalidMultipart(
                "Message has no body parts".to_string(),
            )),
            1 => {
                let part = parts.remove(0);
                for (name, value) in part.headers.iter() {
                    headers.set(name, value);
                }
                Ok(Message::single_part(headers, part.body))
            }
            _ => {
                let boundary = self.boundary.unwrap_or_else(generate_boundary);
                headers.set(
                    "Content-Type",
                    ContentType::multipart_mixed(boundary).to_string(),
                );
                Ok(Message::multipart(headers, parts))
            }
        }
    }
}

/// Generates a boundary that cannot occur in base64 or quoted-printable output.
fn generate_boundary() -> String {
    format!("=_notewrap_{}", uuid::Uuid::new_v4().simple())
}

fn strip_angle_brackets(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('<')
        .and_then(|v| v.strip_suffix('>'))
        .unwrap_or(value)
}

/// Returns the offset just past the line starting at `pos`.
fn next_line_end(raw: &[u8], pos: usize) -> usize {
    raw[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(raw.len(), |i| pos + i + 1)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn strip_trailing_line_break(body: &[u8]) -> &[u8] {
    body.strip_suffix(b"\r\n")
        .or_else(|| body.strip_suffix(b"\n"))
        .unwrap_or(body)
}

/// Splits raw bytes at the first empty line into header block and body.
fn split_head_body(raw: &[u8]) -> (&[u8], &[u8]) {
    let mut pos = 0;
    while pos < raw.len() {
        let end = next_line_end(raw, pos);
        if trim_line_ending(&raw[pos..end]).is_empty() {
            return (&raw[..pos], &raw[end..]);
        }
        pos = end;
    }
    (raw, &[])
}

/// Splits a multipart body into parts (RFC 2046 section 5.1.1).
fn split_multipart(body: &[u8], boundary: &str) -> Result<Vec<Part>> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut current: Option<usize> = None;
    let mut closed = false;
    let mut pos = 0;

    while pos < body.len() {
        let end = next_line_end(body, pos);
        let line = trim_line_ending(&body[pos..end]);

        if let Some(rest) = line.strip_prefix(delimiter.as_bytes()) {
            let (is_close, rest) = rest
                .strip_prefix(b"--")
                .map_or((false, rest), |r| (true, r));

            // Anything but transport padding after the delimiter is content.
            if rest.iter().all(u8::is_ascii_whitespace) {
                if let Some(start) = current.take() {
                    // The line break before a delimiter belongs to the delimiter.
                    let content = strip_trailing_line_break(&body[start..pos]);
                    parts.push(Part::parse(content)?);
                }
                if is_close {
                    closed = true;
                    break;
                }
                current = Some(end);
            }
        }

        pos = end;
    }

    if let Some(start) = current {
        tracing::warn!(boundary, "Multipart body is missing its closing delimiter");
        parts.push(Part::parse(&body[start..])?);
    }

    if parts.is_empty() {
        return Err(Error::InvalidMultipart(format!(
            "No parts found for boundary {boundary}"
        )));
    }
    if !closed {
        tracing::debug!(parts = parts.len(), "Accepted unterminated multipart body");
    }

    Ok(parts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("BASE64"), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
    }

    #[test]
    fn test_part_new() {
        let headers = Headers::new();
        let body = b"Hello, World!".to_vec();
        let part = Part::new(headers, body);
        assert_eq!(part.body, b"Hello, World!");
    }

    #[test]
    fn test_part_body_text() {
        let mut headers = Headers::new();
        headers.add("content-type", "text/plain; charset=utf-8");
        let part = Part::new(headers, b"Hello, World!".to_vec());

        assert_eq!(part.body_text().unwrap(), "Hello, World!");
    }

    #[test]
    fn test_part_body_text_latin1() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain; charset=ISO-8859-1");
        let part = Part::new(headers, vec![b'c', b'a', b'f', 0xE9]);

        assert_eq!(part.body_text().unwrap(), "café");
    }

    #[test]
    fn test_part_encoded_base64() {
        let data = [0_u8, 1, 2, 255];
        let part = Part::encoded(
            &ContentType::new("application", "octet-stream"),
            &data,
            TransferEncoding::Base64,
        );

        assert_eq!(part.headers.get("content-transfer-encoding"), Some("base64"));
        assert_eq!(part.body, b"AAEC/w==");
        assert_eq!(part.decode_body().unwrap(), data);
    }

    #[test]
    fn test_part_external_body() {
        let mut inner = Headers::new();
        inner.add("Content-Type", "image/png");
        let part = Part::external_body("file:///tmp/a.png", &inner);

        assert!(part.content_type().unwrap().is("message", "external-body"));
        assert_eq!(
            part.content_type().unwrap().parameter("URL"),
            Some("file:///tmp/a.png")
        );
        assert_eq!(part.external_headers().unwrap().get("content-type"), Some("image/png"));
    }

    #[test]
    fn test_part_content_id() {
        let mut headers = Headers::new();
        headers.add("Content-ID", "<img1@example.com>");
        let part = Part::new(headers, Vec::new());
        assert_eq!(part.content_id(), Some("img1@example.com"));
    }

    #[test]
    fn test_message_single_part() {
        let mut headers = Headers::new();
        headers.add("from", "sender@example.com");
        headers.add("subject", "Test");

        let message = Message::single_part(headers, b"Hello, World!".to_vec());

        assert_eq!(message.from(), Some("sender@example.com"));
        assert_eq!(message.subject(), Some("Test"));
        assert_eq!(message.body_text().unwrap(), "Hello, World!");
    }

    #[test]
    fn test_message_multipart() {
        let mut headers = Headers::new();
        headers.add("content-type", "multipart/mixed; boundary=abc123");

        let mut part1_headers = Headers::new();
        part1_headers.add("content-type", "text/plain");
        let part1 = Part::new(part1_headers, b"Part 1".to_vec());

        let mut part2_headers = Headers::new();
        part2_headers.add("content-type", "text/plain");
        let part2 = Part::new(part2_headers, b"Part 2".to_vec());

        let message = Message::multipart(headers, vec![part1, part2]);

        assert!(message.is_multipart().unwrap());
        assert_eq!(message.parts.len(), 2);
        assert!(message.body_text().is_err());
    }

    #[test]
    fn test_message_parse_single_part() {
        let raw = concat!(
            "From: sender@example.com\r\n",
            "Subject: Test\r\n",
            "Message-ID: <abc@example.com>\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "Content-Transfer-Encoding: quoted-printable\r\n",
            "\r\n",
            "Caf=C3=A9\r\n"
        );

        let message = Message::parse(raw).unwrap();
        assert_eq!(message.subject(), Some("Test"));
        assert_eq!(message.message_id(), Some("abc@example.com"));
        assert_eq!(message.body_text().unwrap(), "Café");
    }

    #[test]
    fn test_message_parse_multipart() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=outer\n",
            "\n",
            "preamble\n",
            "--outer\n",
            "Content-Type: text/plain\n",
            "\n",
            "first\n",
            "line\n",
            "--outer\n",
            "Content-Type: multipart/alternative; boundary=\"inner\"\n",
            "\n",
            "--inner\n",
            "Content-Type: text/html\n",
            "\n",
            "<p>Html</p>\n",
            "--inner--\n",
            "--outer--\n",
            "epilogue\n"
        );

        let message = Message::parse(raw).unwrap();
        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.parts[0].body_text().unwrap(), "first\nline");

        let nested = message.parts[1].subparts().unwrap();
        assert_eq!(nested.len(), 1);
        assert!(nested[0].content_type().unwrap().is("text", "html"));
        assert_eq!(nested[0].body_text().unwrap(), "<p>Html</p>");
    }

    #[test]
    fn test_message_parse_missing_boundary() {
        let raw = "Content-Type: multipart/mixed\r\n\r\nbody\r\n";
        assert!(matches!(Message::parse(raw), Err(Error::MissingBoundary)));
    }

    #[test]
    fn test_message_parse_no_parts() {
        let raw = "Content-Type: multipart/mixed; boundary=b\r\n\r\nno delimiters\r\n";
        assert!(matches!(
            Message::parse(raw),
            Err(Error::InvalidMultipart(_))
        ));
    }

    #[test]
    fn test_builder_single_part_lifts_content_headers() {
        let message = MessageBuilder::new()
            .subject("Hi")
            .part(Part::encoded(
                &ContentType::text_html(),
                b"<b>x</b>",
                TransferEncoding::QuotedPrintable,
            ))
            .build()
            .unwrap();

        assert!(message.parts.is_empty());
        assert_eq!(message.headers.get("MIME-Version"), Some("1.0"));
        assert!(message.content_type().unwrap().is("text", "html"));
        assert_eq!(message.body_text().unwrap(), "<b>x</b>");
    }

    #[test]
    fn test_builder_requires_a_part() {
        assert!(MessageBuilder::new().subject("empty").build().is_err());
    }

    #[test]
    fn test_builder_multipart_round_trip_through_bytes() {
        let message = MessageBuilder::new()
            .from("from@example.com")
            .message_id("id-1")
            .boundary("fixed-boundary")
            .part(Part::encoded(
                &ContentType::text_plain(),
                b"one\r\n",
                TransferEncoding::QuotedPrintable,
            ))
            .part(Part::encoded(
                &ContentType::new("application", "octet-stream"),
                &[9, 8, 7],
                TransferEncoding::Base64,
            ))
            .build()
            .unwrap();

        let raw = message.to_bytes().unwrap();
        let text = String::from_utf8(raw.clone()).unwrap();
        assert!(text.contains("--fixed-boundary\r\n"));
        assert!(text.ends_with("--fixed-boundary--\r\n"));

        let parsed = Message::parse(&raw).unwrap();
        assert_eq!(parsed, message);
        assert_eq!(parsed.message_id(), Some("id-1"));
        assert_eq!(parsed.parts[0].body_text().unwrap(), "one\r\n");
        assert_eq!(parsed.parts[1].decode_body().unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn test_generated_boundary_is_unique() {
        assert_ne!(generate_boundary(), generate_boundary());
    }
}
