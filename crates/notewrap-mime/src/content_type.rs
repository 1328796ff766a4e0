//! MIME content type and content disposition handling.

use crate::encoding::{decode_charset, decode_percent, decode_rfc2047, encode_rfc2047};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Characters that force a parameter value into a quoted string (RFC 2045 tspecials).
const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

/// Longest quoted parameter value written in one piece; longer values are
/// split into RFC 2231 continuations (`url*0`, `url*1`, ...).
const PARAMETER_SECTION: usize = 60;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "jpeg").
    pub sub_type: String,
    /// Parameters keyed by lowercase name (e.g., charset=utf-8, boundary=xxx).
    pub parameters: BTreeMap<String, String>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "utf-8")
    }

    /// Creates a multipart/mixed content type with boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// Creates a `message/external-body` content type referencing a URL (RFC 2017).
    #[must_use]
    pub fn external_body_url(url: impl Into<String>) -> Self {
        Self::new("message", "external-body")
            .with_parameter("access-type", "URL")
            .with_parameter("url", url)
    }

    /// Adds a parameter. Parameter names are case-insensitive.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns a parameter value by name.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Checks whether this content type is `main/sub`, ignoring case.
    #[must_use]
    pub fn is(&self, main_type: &str, sub_type: &str) -> bool {
        self.main_type.eq_ignore_ascii_case(main_type)
            && self.sub_type.eq_ignore_ascii_case(sub_type)
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Checks if this is a text content type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("text")
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="quoted; value"`
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid.
    pub fn parse(s: &str) -> Result<Self> {
        let mut segments = split_parameters(s).into_iter();

        // Parse type/subtype
        let type_str = segments
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::InvalidContentType("Empty content type".to_string()))?;

        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(format!("Missing subtype in {type_str}")))?;
        let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidContentType(format!(
                "Malformed type: {type_str}"
            )));
        }

        Ok(Self {
            main_type: main_type.to_lowercase(),
            sub_type: sub_type.to_lowercase(),
            parameters: parse_parameters(segments),
        })
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;
        write_parameters(f, &self.parameters)
    }
}

/// Content disposition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispositionKind {
    /// Displayed as part of the message.
    Inline,
    /// Presented as a separate attachment.
    #[default]
    Attachment,
}

/// `Content-Disposition` header value (RFC 2183).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentDisposition {
    /// Disposition kind.
    pub kind: DispositionKind,
    /// Suggested file name, already decoded.
    pub filename: Option<String>,
}

impl ContentDisposition {
    /// Creates an `attachment` disposition.
    #[must_use]
    pub const fn attachment() -> Self {
        Self {
            kind: DispositionKind::Attachment,
            filename: None,
        }
    }

    /// Creates an `inline` disposition.
    #[must_use]
    pub const fn inline() -> Self {
        Self {
            kind: DispositionKind::Inline,
            filename: None,
        }
    }

    /// Sets the file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Parses a `Content-Disposition` value.
    ///
    /// Unknown disposition kinds are treated as `attachment` (RFC 2183 section 2.8).
    ///
    /// # Errors
    ///
    /// Returns an error if an encoded file name cannot be decoded.
    pub fn parse(s: &str) -> Result<Self> {
        let mut segments = split_parameters(s).into_iter();
        let kind = match segments.next() {
            Some(kind) if kind.eq_ignore_ascii_case("inline") => DispositionKind::Inline,
            _ => DispositionKind::Attachment,
        };

        let filename = parse_parameters(segments)
            .remove("filename")
            .map(|name| decode_rfc2047(&name))
            .transpose()?;

        Ok(Self { kind, filename })
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DispositionKind::Inline => f.write_str("inline")?,
            DispositionKind::Attachment => f.write_str("attachment")?,
        }
        if let Some(filename) = &self.filename {
            // Always quoted so an empty name survives.
            let encoded = encode_rfc2047(filename, "utf-8");
            write!(f, "; filename=\"{}\"", escape_quoted(&encoded))?;
        }
        Ok(())
    }
}

/// Splits a header value on `;` outside quoted strings, trimming each segment.
fn split_parameters(s: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                current.push(ch);
                escaped = true;
            }
            '"' => {
                current.push(ch);
                in_quotes = !in_quotes;
            }
            ';' if !in_quotes => segments.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(ch),
        }
    }
    segments.push(current.trim().to_string());

    segments
}

/// One piece of an RFC 2231 parameter.
struct Section {
    value: String,
    extended: bool,
}

/// Parses `key=value` segments, unquoting values. Malformed segments are skipped.
///
/// RFC 2231 continuations (`name*0`, `name*1`) are joined and extended
/// values (`name*=utf-8''%E2%82%AC`) are decoded.
fn parse_parameters(segments: impl Iterator<Item = String>) -> BTreeMap<String, String> {
    let mut parameters = BTreeMap::new();
    let mut continued: BTreeMap<String, BTreeMap<u32, Section>> = BTreeMap::new();

    for segment in segments {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let (name, extended) = key
            .strip_suffix('*')
            .map_or((key.as_str(), false), |name| (name, true));
        let (name, index) = match name.rsplit_once('*') {
            Some((base, index)) if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => {
                (base, index.parse::<u32>().ok())
            }
            _ => (name, None),
        };
        if name.is_empty() {
            continue;
        }

        let value = unquote(value.trim());
        match index {
            Some(index) => {
                continued
                    .entry(name.to_string())
                    .or_default()
                    .insert(index, Section { value, extended });
            }
            None if extended => {
                parameters.insert(name.to_string(), decode_extended(&[Section { value, extended }]));
            }
            None => {
                parameters.insert(name.to_string(), value);
            }
        }
    }

    for (name, sections) in continued {
        let sections: Vec<Section> = sections.into_values().collect();
        parameters
            .entry(name)
            .or_insert_with(|| decode_extended(&sections));
    }

    parameters
}

/// Joins RFC 2231 sections, percent-decoding extended ones.
///
/// The charset comes from the first section (`charset'language'value`).
fn decode_extended(sections: &[Section]) -> String {
    if !sections.iter().any(|s| s.extended) {
        return sections.iter().map(|s| s.value.as_str()).collect();
    }

    let mut charset = "utf-8";
    let mut bytes = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        let mut value = section.value.as_str();
        if i == 0 && section.extended {
            let mut pieces = value.splitn(3, '\'');
            if let (Some(cs), Some(_language), Some(rest)) = (pieces.next(), pieces.next(), pieces.next()) {
                if !cs.is_empty() {
                    charset = cs;
                }
                value = rest;
            }
        }
        if section.extended {
            bytes.extend(decode_percent(value));
        } else {
            bytes.extend_from_slice(value.as_bytes());
        }
    }

    decode_charset(charset, bytes)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Undecodable extended parameter");
            String::new()
        })
}

/// Splits a value into pieces whose quoted form fits [`PARAMETER_SECTION`].
fn split_sections(value: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut width = 0;

    for (idx, ch) in value.char_indices() {
        let char_width = if ch == '"' || ch == '\\' { 2 } else { ch.len_utf8() };
        if width + char_width > PARAMETER_SECTION {
            sections.push(&value[start..idx]);
            start = idx;
            width = 0;
        }
        width += char_width;
    }
    sections.push(&value[start..]);

    sections
}

/// Removes surrounding quotes and resolves backslash escapes.
fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                result.push(next);
            }
        } else {
            result.push(ch);
        }
    }
    result
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn write_parameters(f: &mut fmt::Formatter<'_>, parameters: &BTreeMap<String, String>) -> fmt::Result {
    for (key, value) in parameters {
        let escaped = escape_quoted(value);
        if escaped.len() > PARAMETER_SECTION {
            for (index, section) in split_sections(value).into_iter().enumerate() {
                write!(f, "; {key}*{index}=\"{}\"", escape_quoted(section))?;
            }
        } else if value.is_empty()
            || value.contains(|c: char| c.is_whitespace() || TSPECIALS.contains(c))
        {
            write!(f, "; {key}=\"{escaped}\"")?;
        } else {
            write!(f, "; {key}={value}")?;
        }
    }
    Ok(())
}
