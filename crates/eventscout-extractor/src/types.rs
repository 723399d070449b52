//! Outcome types for document processing

use std::fmt;

/// Where a document is in its processing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// Found in the source directory, not yet checked
    Unseen,
    /// Already in the master store; nothing to do
    Skipped,
    /// Text extracted
    Extracted,
    /// Model answered
    Inferred,
    /// Answer parsed into records
    Parsed,
    /// Analysis record written to the master store
    Appended,
}

impl DocumentState {
    /// Lowercase name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentState::Unseen => "unseen",
            DocumentState::Skipped => "skipped",
            DocumentState::Extracted => "extracted",
            DocumentState::Inferred => "inferred",
            DocumentState::Parsed => "parsed",
            DocumentState::Appended => "appended",
        }
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// A new analysis record was written
    Appended {
        /// Document file name
        document_name: String,
        /// Entries in the new record
        event_count: usize,
        /// Records in the store after the append
        total_records: usize,
    },

    /// The store already had the document
    Skipped {
        /// Document file name
        document_name: String,
    },
}

/// A document that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Document file name
    pub document_name: String,

    /// Error message
    pub reason: String,
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents appended, in processing order
    pub appended: Vec<String>,

    /// Documents already recorded
    pub skipped: Vec<String>,

    /// Documents that failed; they stay unrecorded and are retried next run
    pub failed: Vec<DocumentFailure>,

    /// The operator declined to start
    pub aborted: bool,
}

impl RunSummary {
    /// A summary for a run the operator declined
    pub fn aborted() -> Self {
        Self {
            aborted: true,
            ..Self::default()
        }
    }

    /// Number of documents looked at
    pub fn documents_seen(&self) -> usize {
        self.appended.len() + self.skipped.len() + self.failed.len()
    }

    /// Whether every document was either appended or skipped
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && !self.aborted
    }
}
