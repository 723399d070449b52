//! eventscout Report Exporter
//!
//! Flattens the master store into two CSV files:
//!
//! - **No New Events.csv**: one row per document the model found nothing new in
//! - **New Events.csv**: one row per suggested event
//!
//! Both files are rewritten from scratch on every export. A file with no rows
//! holds the single line `No data` instead of a header.

#![warn(missing_docs)]

use eventscout_domain::{AnalysisRecord, EventEntry, NOT_AVAILABLE};
use eventscout_store::{MasterStore, StoreError};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Default file name for documents without new events
pub const NO_EVENTS_FILE: &str = "No New Events.csv";

/// Default file name for suggested events
pub const NEW_EVENTS_FILE: &str = "New Events.csv";

/// Written instead of a table when there are no rows
pub const EMPTY_PLACEHOLDER: &str = "No data\n";

/// Errors that can occur during export
#[derive(Error, Debug)]
pub enum ReportError {
    /// The master store could not be read
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An output file could not be written
    #[error("Cannot write {}: {source}", .path.display())]
    Io {
        /// Output file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// CSV encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A document the model found no new events in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoEventRow {
    /// When the document was analyzed
    pub processing_time: String,
    /// Document file name
    pub pdf_file: String,
    /// Model explanation
    pub explanation: String,
}

/// One suggested event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEventRow {
    /// When the parent document was analyzed
    pub processed_time: String,
    /// Parent document file name
    pub pdf_file: String,
    /// Event name
    #[serde(rename = "System event")]
    pub system_event: String,
    /// Context to log
    #[serde(rename = "suggested log")]
    pub suggested_log: String,
    /// Reasoning
    pub rationale: String,
}

/// Split records into the two row sets
///
/// A record whose first entry is a no-event marker yields one
/// [`NoEventRow`]; any other record yields one [`NewEventRow`] per entry.
pub fn project(records: &[AnalysisRecord]) -> (Vec<NoEventRow>, Vec<NewEventRow>) {
    let mut no_events = Vec::new();
    let mut new_events = Vec::new();

    for record in records {
        match record.events.first() {
            None => {}
            Some(EventEntry::NoEvents(marker)) => no_events.push(NoEventRow {
                processing_time: record.processed_at.clone(),
                pdf_file: record.document_name.clone(),
                explanation: marker.explanation.clone(),
            }),
            Some(EventEntry::Event(_)) => {
                new_events.extend(record.events.iter().map(|entry| new_event_row(record, entry)));
            }
        }
    }

    (no_events, new_events)
}

fn new_event_row(record: &AnalysisRecord, entry: &EventEntry) -> NewEventRow {
    let (system_event, suggested_log, rationale) = match entry {
        EventEntry::Event(event) => (
            event.system_event().into_owned(),
            event.suggested_log().into_owned(),
            event.rationale().into_owned(),
        ),
        EventEntry::NoEvents(_) => (
            NOT_AVAILABLE.to_string(),
            NOT_AVAILABLE.to_string(),
            NOT_AVAILABLE.to_string(),
        ),
    };
    NewEventRow {
        processed_time: record.processed_at.clone(),
        pdf_file: record.document_name.clone(),
        system_event,
        suggested_log,
        rationale,
    }
}

/// Row counts of one export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Rows in the no-events file
    pub no_event_rows: usize,
    /// Rows in the new-events file
    pub new_event_rows: usize,
}

/// Writes the two report files
#[derive(Debug, Clone)]
pub struct ReportExporter {
    no_events_path: PathBuf,
    new_events_path: PathBuf,
}

impl ReportExporter {
    /// Exporter writing the default file names into `out_dir`
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        let out_dir = out_dir.as_ref();
        Self {
            no_events_path: out_dir.join(NO_EVENTS_FILE),
            new_events_path: out_dir.join(NEW_EVENTS_FILE),
        }
    }

    /// Exporter with explicit output paths
    pub fn with_paths(no_events_path: impl Into<PathBuf>, new_events_path: impl Into<PathBuf>) -> Self {
        Self {
            no_events_path: no_events_path.into(),
            new_events_path: new_events_path.into(),
        }
    }

    /// Path of the no-events file
    pub fn no_events_path(&self) -> &Path {
        &self.no_events_path
    }

    /// Path of the new-events file
    pub fn new_events_path(&self) -> &Path {
        &self.new_events_path
    }

    /// Read `store` once and write both files
    pub fn export(&self, store: &MasterStore) -> Result<ExportSummary, ReportError> {
        let records = store.load()?;
        self.export_records(&records)
    }

    /// Write both files from already loaded records
    pub fn export_records(&self, records: &[AnalysisRecord]) -> Result<ExportSummary, ReportError> {
        let (no_events, new_events) = project(records);

        write_rows(&self.no_events_path, &no_events)?;
        write_rows(&self.new_events_path, &new_events)?;

        let summary = ExportSummary {
            no_event_rows: no_events.len(),
            new_event_rows: new_events.len(),
        };
        info!(
            "Generated CSVs: {} no-event entries, {} new-event rows",
            summary.no_event_rows, summary.new_event_rows
        );
        Ok(summary)
    }
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new(".")
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ReportError> {
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    if rows.is_empty() {
        let mut file = File::create(path).map_err(io_error)?;
        file.write_all(EMPTY_PLACEHOLDER.as_bytes()).map_err(io_error)?;
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(io_error)?;
    Ok(())
}
