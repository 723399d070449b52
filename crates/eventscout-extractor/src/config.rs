//! Configuration for the Processor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What part of a document is sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Extracted text only, inline in the user turn
    Text,
    /// The PDF itself, base64 encoded
    Attachment,
    /// Both of the above
    #[default]
    Both,
}

impl ContentMode {
    /// Whether extracted text is sent inline
    pub fn sends_text(self) -> bool {
        matches!(self, ContentMode::Text | ContentMode::Both)
    }

    /// Whether the PDF is attached
    pub fn sends_attachment(self) -> bool {
        matches!(self, ContentMode::Attachment | ContentMode::Both)
    }
}

/// Configuration for the Processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Maximum time for a single inference call (seconds)
    pub inference_timeout_secs: u64,

    /// What to send to the model
    pub content_mode: ContentMode,

    /// Abort the whole run on the first failing document
    pub fail_fast: bool,

    /// Inline text beyond this many characters is cut off
    pub max_text_chars: usize,

    /// Characters of each response echoed to the log
    pub preview_chars: usize,
}

impl ProcessorConfig {
    /// Get the inference timeout as a Duration
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.inference_timeout_secs == 0 {
            return Err("inference_timeout_secs must be greater than 0".to_string());
        }
        if self.content_mode.sends_text() && self.max_text_chars == 0 {
            return Err("max_text_chars must be greater than 0 when text is sent".to_string());
        }
        Ok(())
    }

    /// Strict preset: stop at the first failing document
    pub fn strict() -> Self {
        Self {
            fail_fast: true,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            inference_timeout_secs: 300,
            content_mode: ContentMode::Both,
            fail_fast: false,
            max_text_chars: 200_000,
            preview_chars: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.fail_fast);
        assert_eq!(config.inference_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_strict_config() {
        let config = ProcessorConfig::strict();
        assert!(config.validate().is_ok());
        assert!(config.fail_fast);
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = ProcessorConfig {
            inference_timeout_secs: 0,
            ..ProcessorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_text_limit_only_matters_when_sending_text() {
        let mut config = ProcessorConfig {
            max_text_chars: 0,
            ..ProcessorConfig::default()
        };
        assert!(config.validate().is_err());

        config.content_mode = ContentMode::Attachment;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ProcessorConfig::from_toml("fail_fast = true\ncontent_mode = \"text\"\n").unwrap();
        assert!(config.fail_fast);
        assert_eq!(config.content_mode, ContentMode::Text);
        assert_eq!(config.inference_timeout_secs, 300);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ProcessorConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = ProcessorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
