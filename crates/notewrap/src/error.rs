//! Error types for the note codec.

use thiserror::Error;

/// Errors that can occur while converting between notes and messages.
#[derive(Debug, Error)]
pub enum Error {
    /// MIME encoding or decoding failed.
    #[error("MIME error: {0}")]
    Mime(#[from] notewrap_mime::Error),

    /// The custom-fields part could not be encoded or decoded.
    #[error("Invalid custom fields: {0}")]
    CustomFields(#[from] serde_json::Error),

    /// The message carries no part that could hold the note text.
    #[error("Message has no text part")]
    MissingText,

    /// An attachment part is malformed.
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
