//! eventscout Extractor
//!
//! Turns specification PDFs into analysis records using a language model.
//!
//! # Architecture
//!
//! ```text
//! PDF → PdfTextExtractor → PromptBuilder → InferenceProvider → parse_response → MasterStore
//! ```
//!
//! [`Processor`] drives that pipeline once per document found in the source
//! directory, skipping every document the master store already holds. Runs
//! are therefore incremental: a second run over an unchanged directory does
//! no inference and appends nothing.
//!
//! # Example Usage
//!
//! ```no_run
//! use eventscout_extractor::{PdfTextExtractor, Processor, ProcessorConfig};
//! use eventscout_domain::AutoConfirm;
//! use eventscout_llm::MockProvider;
//! use eventscout_store::MasterStore;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let processor = Processor::new(
//!     MockProvider::default(),
//!     PdfTextExtractor,
//!     MasterStore::new("autosar_security_events.json"),
//!     ProcessorConfig::default(),
//! );
//!
//! let summary = processor
//!     .run(Path::new("./Autosar_Standards/R25-11/CP"), &mut AutoConfirm(true))
//!     .await?;
//!
//! println!("Appended: {}", summary.appended.len());
//! println!("Skipped: {}", summary.skipped.len());
//! println!("Failed: {}", summary.failed.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod parser;
mod pdf;
mod processor;
mod prompt;
mod types;

pub use config::{ContentMode, ProcessorConfig};
pub use discovery::discover_documents;
pub use error::ExtractorError;
pub use parser::{parse_response, BLOCK_LABEL, NO_EVENTS_SENTINEL};
pub use pdf::{PdfError, PdfTextExtractor};
pub use processor::{Processor, FULL_RUN_QUESTION};
pub use prompt::PromptBuilder;
pub use types::{DocumentFailure, DocumentOutcome, DocumentState, RunSummary};
