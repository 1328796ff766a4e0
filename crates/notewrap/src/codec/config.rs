//! Codec configuration types.

use notewrap_mime::TransferEncoding;
use serde::{Deserialize, Serialize};

/// Transfer encoding used for the note text and custom fields.
///
/// Both encodings reproduce the text byte for byte, including line breaks
/// and trailing whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Quoted-Printable: readable for mostly-ASCII text.
    #[default]
    QuotedPrintable,
    /// Base64: compact for mostly non-ASCII text.
    Base64,
}

impl From<TextEncoding> for TransferEncoding {
    fn from(encoding: TextEncoding) -> Self {
        match encoding {
            TextEncoding::QuotedPrintable => Self::QuotedPrintable,
            TextEncoding::Base64 => Self::Base64,
        }
    }
}

/// Note codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Encoding for text and custom-field parts.
    pub text_encoding: TextEncoding,
    /// Assign a uid and timestamps to notes that lack them.
    pub populate_defaults: bool,
    /// Value of the `User-Agent` header, omitted when unset.
    pub user_agent: Option<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            text_encoding: TextEncoding::QuotedPrintable,
            populate_defaults: true,
            user_agent: None,
        }
    }
}

impl CodecConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::new()
    }
}

/// Builder for codec configuration.
#[derive(Debug, Clone, Default)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text encoding.
    #[must_use]
    pub const fn text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.text_encoding = encoding;
        self
    }

    /// Enables or disables uid and timestamp population.
    #[must_use]
    pub const fn populate_defaults(mut self, populate: bool) -> Self {
        self.config.populate_defaults = populate;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> CodecConfig {
        self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.text_encoding, TextEncoding::QuotedPrintable);
        assert!(config.populate_defaults);
        assert_eq!(config.user_agent, None);
    }

    #[test]
    fn test_builder() {
        let config = CodecConfig::builder()
            .text_encoding(TextEncoding::Base64)
            .populate_defaults(false)
            .user_agent("notewrap/test")
            .build();

        assert_eq!(config.text_encoding, TextEncoding::Base64);
        assert!(!config.populate_defaults);
        assert_eq!(config.user_agent.as_deref(), Some("notewrap/test"));
    }

    #[test]
    fn test_json_partial_config() {
        let config: CodecConfig = serde_json::from_str(r#"{"text_encoding":"base64"}"#).unwrap();
        assert_eq!(config.text_encoding, TextEncoding::Base64);
        assert!(config.populate_defaults);
    }

    #[test]
    fn test_transfer_encoding_conversion() {
        assert_eq!(
            TransferEncoding::from(TextEncoding::Base64),
            TransferEncoding::Base64
        );
    }
}
