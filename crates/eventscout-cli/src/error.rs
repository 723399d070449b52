//! Error types for the CLI application.

use eventscout_extractor::ExtractorError;
use eventscout_llm::LlmError;
use eventscout_report::ReportError;
use eventscout_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error, including a missing API key
    #[error("Configuration error: {0}")]
    Config(String),

    /// Processing error
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Master store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Report export error
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Inference provider setup error
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Some documents could not be processed
    #[error("{0} document(s) failed; run again to retry them")]
    Incomplete(usize),
}
