//! Conversion between [`Note`]s and MIME [`Message`]s.
//!
//! A note becomes a message whose headers carry the metadata:
//!
//! | header | field |
//! |---|---|
//! | `Subject` | title |
//! | `From` | author |
//! | `Date` | creation date |
//! | `Message-ID`, `X-Note-Uid` | uid |
//! | `X-Note-Last-Modified` | last-modified date |
//! | `X-Note-Classification` | classification |
//!
//! The text is the body (`text/plain` or `text/html`). Custom fields and
//! attachments turn the message into `multipart/mixed`: text first, then a
//! JSON part for the custom fields, then one part per attachment. Those
//! extra parts are tagged with `X-Note-Part`. URL attachments use
//! `message/external-body` (RFC 2017).

mod config;
mod parse;
mod serialize;

pub use config::{CodecConfig, CodecConfigBuilder, TextEncoding};

use notewrap_mime::Message;

use crate::error::Result;
use crate::note::Note;

const UID_HEADER: &str = "X-Note-Uid";
const LAST_MODIFIED_HEADER: &str = "X-Note-Last-Modified";
const CLASSIFICATION_HEADER: &str = "X-Note-Classification";
const PART_HEADER: &str = "X-Note-Part";
const PART_CUSTOM: &str = "custom";
const PART_ATTACHMENT: &str = "attachment";

/// Converts notes to messages and back using a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct NoteCodec {
    config: CodecConfig,
}

impl NoteCodec {
    /// Creates a codec with the given configuration.
    #[must_use]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Builds a message from a note.
    ///
    /// The note itself is left untouched. When `populate_defaults` is set,
    /// an empty uid is replaced by a random UUID and unset dates by the
    /// current time, in the message only.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom fields cannot be encoded.
    pub fn serialize(&self, note: &Note) -> Result<Message> {
        serialize::serialize(&self.config, note)
    }

    /// Recovers a note from a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message has no text, an encoded header or
    /// body is invalid, or a note part is malformed.
    pub fn parse(&self, message: &Message) -> Result<Note> {
        parse::parse(message)
    }

    /// Builds a message from a note and renders it to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize_to_bytes(&self, note: &Note) -> Result<Vec<u8>> {
        Ok(self.serialize(note)?.to_bytes()?)
    }

    /// Parses raw message bytes into a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is malformed or parsing fails.
    pub fn parse_bytes(&self, raw: impl AsRef<[u8]>) -> Result<Note> {
        self.parse(&Message::parse(raw)?)
    }
}

/// Builds a message from a note with the default configuration.
///
/// # Errors
///
/// Returns an error if the custom fields cannot be encoded.
pub fn serialize(note: &Note) -> Result<Message> {
    NoteCodec::default().serialize(note)
}

/// Recovers a note from a message.
///
/// # Errors
///
/// Returns an error if the message has no text, an encoded header or body
/// is invalid, or a note part is malformed.
pub fn parse(message: &Message) -> Result<Note> {
    NoteCodec::default().parse(message)
}
