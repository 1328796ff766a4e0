//! Note data model.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Attachment;

/// How the note text is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// Plain text, shown verbatim even if it looks like markup.
    #[default]
    Plain,
    /// HTML rich text.
    Rich,
}

/// Access category of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Visible to everyone with access to the collection.
    #[default]
    Public,
    /// Visible to the owner only.
    Private,
    /// Restricted to explicitly trusted readers.
    Confidential,
}

impl Classification {
    /// Returns the header representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
            Self::Confidential => "Confidential",
        }
    }

    /// Parses a classification, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "confidential" => Some(Self::Confidential),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured note.
///
/// An empty `uid` and unset dates mean "not assigned yet"; the codec fills
/// them in when the note is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    /// Note title.
    pub title: String,
    /// Note body.
    pub text: String,
    /// Interpretation of `text`.
    pub text_format: TextFormat,
    /// Unique identifier.
    pub uid: String,
    /// Access category.
    pub classification: Classification,
    /// Author address.
    pub from: String,
    /// When the note was created.
    ///
    /// Messages carry whole seconds only; a fractional part is dropped on
    /// serialization. Years must lie within 0..=9999.
    pub creation_date: Option<DateTime<Utc>>,
    /// When the note was last changed. Same precision and range as
    /// `creation_date`.
    pub last_modified_date: Option<DateTime<Utc>>,
    /// Attachments in display order.
    pub attachments: Vec<Attachment>,
    /// Application-defined key/value metadata.
    pub custom: BTreeMap<String, String>,
}

impl Note {
    /// Creates an empty note.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets plain text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.set_text_with_format(text, TextFormat::Plain);
    }

    /// Sets text with an explicit format.
    pub fn set_text_with_format(&mut self, text: impl Into<String>, format: TextFormat) {
        self.text = text.into();
        self.text_format = format;
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the text and its format.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>, format: TextFormat) -> Self {
        self.set_text_with_format(text, format);
        self
    }

    /// Sets the unique identifier.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Sets the classification.
    #[must_use]
    pub const fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Sets the creation date.
    #[must_use]
    pub const fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Sets the last-modified date.
    #[must_use]
    pub const fn with_last_modified_date(mut self, date: DateTime<Utc>) -> Self {
        self.last_modified_date = Some(date);
        self
    }

    /// Appends an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Inserts a custom key/value pair.
    #[must_use]
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// Returns the text as plain text.
    ///
    /// Plain notes are returned unchanged; rich notes are converted from
    /// HTML to readable Markdown-flavoured text. If conversion fails the
    /// raw HTML is returned.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        match self.text_format {
            TextFormat::Plain => self.text.clone(),
            TextFormat::Rich => htmd::HtmlToMarkdown::builder()
                .skip_tags(vec!["head", "style", "script"])
                .build()
                .convert(&self.text)
                .map(|text| text.trim().to_string())
                .unwrap_or_else(|e| {
                    tracing::warn!(?e, "Failed to convert rich text");
                    self.text.clone()
                }),
        }
    }
}
