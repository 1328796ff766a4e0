//! Note attachments.

use serde::{Deserialize, Serialize};

/// Where an attachment's content lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentPayload {
    /// Reference to content stored elsewhere.
    Url(String),
    /// Content carried inside the note.
    Inline(#[serde(with = "base64_bytes")] Vec<u8>),
}

/// A file attached to a note, either by reference or inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// The attachment content or its location.
    pub payload: AttachmentPayload,
    /// MIME type of the content (e.g., "image/png").
    ///
    /// Written verbatim as a header value, so it must not contain control
    /// characters or surrounding whitespace.
    pub mime_type: String,
    /// Human-readable label, written as the file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Content-ID so rich text can reference the attachment (`cid:` URLs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

impl Attachment {
    /// Creates an attachment referencing `url`.
    #[must_use]
    pub fn from_url(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: AttachmentPayload::Url(url.into()),
            mime_type: mime_type.into(),
            label: None,
            content_id: None,
        }
    }

    /// Creates an attachment carrying `data` inline.
    #[must_use]
    pub fn from_data(data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: AttachmentPayload::Inline(data.into()),
            mime_type: mime_type.into(),
            label: None,
            content_id: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the Content-ID.
    #[must_use]
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Returns the URL for referenced attachments.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.payload {
            AttachmentPayload::Url(url) => Some(url),
            AttachmentPayload::Inline(_) => None,
        }
    }

    /// Returns the content for inline attachments.
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        match &self.payload {
            AttachmentPayload::Url(_) => None,
            AttachmentPayload::Inline(data) => Some(data),
        }
    }
}

/// Serde helpers writing inline payloads as Base64 strings.
mod base64_bytes {
    use notewrap_mime::encoding::{decode_base64, encode_base64};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)] // Required by serde with= signature
    pub fn serialize<S>(data: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode_base64(data))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_base64(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        let attachment = Attachment::from_url("file://url/to/file", "mimetype/mime");
        assert_eq!(attachment.url(), Some("file://url/to/file"));
        assert_eq!(attachment.data(), None);
        assert_eq!(attachment.label, None);
    }

    #[test]
    fn test_from_data_with_label() {
        let attachment = Attachment::from_data("testfile2", "mimetype/mime3").with_label("label");
        assert_eq!(attachment.data(), Some(&b"testfile2"[..]));
        assert_eq!(attachment.label.as_deref(), Some("label"));
    }

    #[test]
    fn test_json_uses_base64_for_inline_data() {
        let attachment = Attachment::from_data(vec![0_u8, 255], "application/octet-stream");
        let json = serde_json::to_string(&attachment).unwrap();
        assert!(json.contains("\"inline\":\"AP8=\""));
        assert!(!json.contains("label"));

        let back: Attachment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attachment);
    }
}
