//! eventscout Domain Layer
//!
//! This crate contains the data model shared by every other eventscout crate
//! and the trait interfaces for the external collaborators (text extraction,
//! inference, operator confirmation).
//!
//! ## Key Concepts
//!
//! - **Analysis Record**: the persisted outcome of processing one source document
//! - **Event Record**: one suggested new security-event log
//! - **No-Event Record**: marker stating the model found nothing new for a document
//! - **Name Matcher**: the policy deciding whether a document was already recorded
//!
//! ## Architecture
//!
//! - No I/O in this crate
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod matching;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use matching::{name_already_recorded, ExactMatch, MatchPolicy, NameMatcher, SubstringMatch};
pub use record::{
    format_processed_at, AnalysisRecord, EventEntry, EventRecord, NoEventRecord, NoEventStatus,
    NOT_AVAILABLE, RATIONALE_KEY, SECTION_KEY, SUGGESTED_LOG_KEY, SYSTEM_EVENT_KEY,
};
pub use traits::{AutoConfirm, Confirmation, DocumentAttachment, InferenceProvider, InferenceRequest, TextExtractor};
