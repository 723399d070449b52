//! Error types for the Extractor

use eventscout_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while processing documents
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Inference provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Inference did not finish in time
    #[error("Inference timeout after {0}s")]
    Timeout(u64),

    /// Master store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The document could not be opened or parsed
    #[error("Extraction failed for {document}: {reason}")]
    Extraction {
        /// Document file name
        document: String,
        /// Extractor message
        reason: String,
    },

    /// The source directory could not be listed
    #[error("Cannot read source directory {}: {source}", .path.display())]
    SourceDir {
        /// Source directory
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Other I/O error (reading a document, prompting the operator)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
