//! Configuration management for the CLI.
//!
//! Settings come from `eventscout.toml`, looked up in this order:
//!
//! 1. the `--config` path (must exist)
//! 2. `./eventscout.toml`
//! 3. `<user config dir>/eventscout/eventscout.toml`
//!
//! Every key has a default, so a missing file is not an error. Command-line
//! flags override the file. The API key is never read from the file.

use crate::error::{CliError, Result};
use eventscout_domain::MatchPolicy;
use eventscout_extractor::ProcessorConfig;
use eventscout_llm::ChatSettings;
use eventscout_store::{MasterStore, DEFAULT_STORE_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name
pub const CONFIG_FILE: &str = "eventscout.toml";

/// Environment variable holding the inference API key
pub const API_KEY_VAR: &str = "PERPLEXITY_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the PDFs are
    pub source: SourceSettings,

    /// Master file settings
    pub store: StoreSettings,

    /// Model endpoint and sampling
    pub inference: ChatSettings,

    /// Pipeline behavior
    pub processing: ProcessorConfig,

    /// CSV output
    pub report: ReportSettings,

    /// Terminal output
    pub output: OutputSettings,
}

/// Source directory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Directory scanned for documents
    pub dir: PathBuf,
}

/// Master file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Master JSON file
    pub path: PathBuf,

    /// How stored names are compared with new documents
    pub match_policy: MatchPolicy,
}

/// Report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory the CSV files are written to
    pub out_dir: PathBuf,
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Per-user configuration file path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("eventscout").join(CONFIG_FILE))
    }

    /// Load configuration from `explicit`, or the first file found, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }

        match Self::user_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check values that would only fail later.
    pub fn validate(&self) -> Result<()> {
        self.processing.validate().map_err(CliError::Config)?;
        if self.inference.model.trim().is_empty() {
            return Err(CliError::Config("inference.model must not be empty".into()));
        }
        Ok(())
    }

    /// Master store at `path`, or the configured one, with the configured policy.
    pub fn master_store(&self, path: Option<PathBuf>) -> MasterStore {
        MasterStore::new(path.unwrap_or_else(|| self.store.path.clone()))
            .with_matcher(self.store.match_policy)
    }
}

/// Read the API key from the environment (a `.env` file is loaded at startup).
pub fn api_key() -> Result<String> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String> {
    value
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| CliError::Config(format!("Set {} in the environment or a .env file", API_KEY_VAR)))
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./Autosar_Standards/R25-11/CP"),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_FILE),
            match_policy: MatchPolicy::Substring,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventscout_extractor::ContentMode;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.path, PathBuf::from("autosar_security_events.json"));
        assert_eq!(config.store.match_policy, MatchPolicy::Substring);
        assert_eq!(config.inference.model, "sonar");
        assert!(config.output.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [source]
            dir = "/data/pdfs"

            [store]
            match_policy = "exact"

            [processing]
            content_mode = "text"
            fail_fast = true
            "#,
        )
        .unwrap();

        assert_eq!(config.source.dir, PathBuf::from("/data/pdfs"));
        assert_eq!(config.store.match_policy, MatchPolicy::Exact);
        assert_eq!(config.store.path, PathBuf::from("autosar_security_events.json"));
        assert_eq!(config.processing.content_mode, ContentMode::Text);
        assert!(config.processing.fail_fast);
        assert_eq!(config.processing.inference_timeout_secs, 300);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = Config::from_toml("[processing]\ninference_timeout_secs = 0\n");
        assert!(matches!(result, Err(CliError::Config(_))));

        let result = Config::from_toml("[inference]\nmodel = \"\"\n");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(Config::from_toml("[source"), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[report]\nout_dir = \"out\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.report.out_dir, PathBuf::from("out"));

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_api_key_required() {
        assert!(matches!(api_key_from(None), Err(CliError::Config(_))));
        assert!(matches!(api_key_from(Some("  ".into())), Err(CliError::Config(_))));
        assert_eq!(api_key_from(Some("pplx-123".into())).unwrap(), "pplx-123");
    }
}
