//! MIME layer errors.

use std::string::FromUtf8Error;

/// Result alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing, decoding or rendering MIME data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header line or name is malformed.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A `Content-Type` value cannot be parsed, or names an unexpected type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// A Quoted-Printable or RFC 2047 payload is malformed.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A Base64 payload is malformed.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Decoded text is not valid in its declared charset.
    #[error("Text is not valid UTF-8: {0}")]
    Utf8Decode(#[from] FromUtf8Error),

    /// A date header is neither RFC 2822 nor RFC 3339.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A `multipart/*` content type lacks its `boundary` parameter.
    #[error("Multipart content type has no boundary")]
    MissingBoundary,

    /// A multipart body is malformed or used where a single part is expected.
    #[error("Invalid multipart structure: {0}")]
    InvalidMultipart(String),

    /// The message was built without a body.
    #[error("Message has no body")]
    MissingBody,
}
