//! Codec settings stored in the user's config directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notewrap::CodecConfig;

/// Location of the settings file: `<config_dir>/notewrap/config.json`.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notewrap")
        .join("config.json")
}

/// Loads settings from the default location.
pub fn load_settings() -> Result<CodecConfig> {
    load_settings_from(&settings_path())
}

/// Loads settings from `path`, falling back to defaults if it does not exist.
pub fn load_settings_from(path: &Path) -> Result<CodecConfig> {
    if !path.exists() {
        tracing::debug!("No settings at {:?}, using defaults", path);
        return Ok(CodecConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let config = parse_settings(&contents)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    tracing::info!("Settings loaded from {:?}", path);
    Ok(config)
}

fn parse_settings(contents: &str) -> Result<CodecConfig> {
    Ok(serde_json::from_str(contents)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use notewrap::TextEncoding;

    #[test]
    fn test_settings_path() {
        let path = settings_path();
        assert!(path.ends_with("notewrap/config.json"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_settings_from(Path::new("/nonexistent/notewrap/config.json")).unwrap();
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn test_parse_settings() {
        let config =
            parse_settings(r#"{"text_encoding":"base64","user_agent":"notewrap"}"#).unwrap();
        assert_eq!(config.text_encoding, TextEncoding::Base64);
        assert_eq!(config.user_agent.as_deref(), Some("notewrap"));
        assert!(config.populate_defaults);
    }

    #[test]
    fn test_parse_invalid_settings() {
        assert!(parse_settings(r#"{"text_encoding":"rot13"}"#).is_err());
    }
}
