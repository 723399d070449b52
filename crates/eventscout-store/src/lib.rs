//! eventscout Storage Layer
//!
//! The master store is a single JSON document:
//!
//! ```text
//! {
//!   "pdf_analyses": [
//!     {"processed_at": "...", "pdf_file": "...", "num_events": 2, "events": [...]},
//!     ...
//!   ]
//! }
//! ```
//!
//! Every append is a full read-modify-write of that document. The new content
//! is written to a temporary file in the same directory and renamed over the
//! old one, so a crash mid-write leaves either the old or the new file.
//! There is no locking: one writer process at a time is assumed.
//!
//! The store does not deduplicate. Callers check [`MasterStore::contains`]
//! before appending.
//!
//! # Examples
//!
//! ```no_run
//! use eventscout_store::MasterStore;
//! use eventscout_domain::{AnalysisRecord, NoEventRecord};
//!
//! let store = MasterStore::new("autosar_security_events.json");
//! if !store.contains("SWS_Crypto.pdf")? {
//!     let record = AnalysisRecord::new("SWS_Crypto.pdf", vec![NoEventRecord::new("none").into()]);
//!     store.append(record)?;
//! }
//! # Ok::<(), eventscout_store::StoreError>(())
//! ```

#![warn(missing_docs)]

use eventscout_domain::{name_already_recorded, AnalysisRecord, NameMatcher, SubstringMatch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Default master file name
pub const DEFAULT_STORE_FILE: &str = "autosar_security_events.json";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the master file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Master file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The master file exists but is not a valid master document
    #[error("Corrupt master file {}: {source}", .path.display())]
    Corrupt {
        /// Master file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Top-level shape of the master file
///
/// Stored records are never re-typed on the way back out: events keep their
/// keys and key order, and unknown top-level keys are carried along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterDocument {
    /// All analysis records, oldest first
    pub pdf_analyses: Vec<AnalysisRecord>,

    /// Any other top-level key
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JSON-file backed store of analysis records
pub struct MasterStore {
    path: PathBuf,
    matcher: Box<dyn NameMatcher + Send + Sync>,
}

impl MasterStore {
    /// Create a store for the file at `path`, matching names by substring
    ///
    /// Nothing is read or created until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            matcher: Box::new(SubstringMatch),
        }
    }

    /// Replace the policy used by [`MasterStore::contains`]
    pub fn with_matcher(mut self, matcher: impl NameMatcher + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Path of the master file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the master file is present
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load every record, or an empty list if the file does not exist
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`] if the file is not a valid master document.
    pub fn load(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        Ok(self.load_document()?.pdf_analyses)
    }

    /// Load the whole master document
    pub fn load_document(&self) -> Result<MasterDocument, StoreError> {
        if !self.exists() {
            debug!("Master file {} not found, starting empty", self.path.display());
            return Ok(MasterDocument::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Whether a record for `document_name` already exists
    pub fn contains(&self, document_name: &str) -> Result<bool, StoreError> {
        let records = self.load()?;
        Ok(name_already_recorded(&records, document_name, self.matcher.as_ref()))
    }

    /// Append one record and rewrite the file
    ///
    /// Returns the number of records now stored.
    pub fn append(&self, record: AnalysisRecord) -> Result<usize, StoreError> {
        let mut document = self.load_document()?;
        document.pdf_analyses.push(record);
        self.write_document(&document)?;

        let total = document.pdf_analyses.len();
        info!("Appended to master file {} (total analyses: {})", self.path.display(), total);
        Ok(total)
    }

    /// Replace the whole file with `records`
    pub fn write_all(&self, records: Vec<AnalysisRecord>) -> Result<(), StoreError> {
        self.write_document(&MasterDocument {
            pdf_analyses: records,
            ..MasterDocument::default()
        })
    }

    fn write_document(&self, document: &MasterDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| self.io_error(source))?;
        tmp.write_all(&bytes).map_err(|source| self.io_error(source))?;
        tmp.as_file().sync_all().map_err(|source| self.io_error(source))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl std::fmt::Debug for MasterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterStore").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventscout_domain::{EventRecord, ExactMatch, NoEventRecord};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> MasterStore {
        MasterStore::new(dir.path().join("master.json"))
    }

    fn record(name: &str) -> AnalysisRecord {
        AnalysisRecord::with_timestamp(
            "2025-11-20T10:00:00.000000",
            name,
            vec![NoEventRecord::new("nothing new").into()],
        )
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
        assert!(!store.contains("a.pdf").unwrap());
    }

    #[test]
    fn test_append_creates_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.append(record("a.pdf")).unwrap(), 1);
        assert!(store.exists());
        assert_eq!(store.append(record("b.pdf")).unwrap(), 2);

        let records = store.load().unwrap();
        assert_eq!(records[0].document_name, "a.pdf");
        assert_eq!(records[1].document_name, "b.pdf");
    }

    #[test]
    fn test_append_does_not_deduplicate() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("a.pdf")).unwrap();
        store.append(record("a.pdf")).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_contains_uses_substring_by_default() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("report_a.pdf")).unwrap();

        assert!(store.contains("report_a.pdf").unwrap());
        assert!(store.contains("a.pdf").unwrap());
        assert!(!store.contains("b.pdf").unwrap());
    }

    #[test]
    fn test_contains_with_exact_matcher() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).with_matcher(ExactMatch);
        store.append(record("report_a.pdf")).unwrap();

        assert!(store.contains("report_a.pdf").unwrap());
        assert!(!store.contains("a.pdf").unwrap());
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
        assert!(matches!(store.append(record("a.pdf")), Err(StoreError::Corrupt { .. })));
        // The corrupt file is left untouched
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_write_all_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("a.pdf")).unwrap();

        store
            .write_all(vec![AnalysisRecord::with_timestamp(
                "t",
                "b.pdf",
                vec![EventRecord::new("e", "l", "r").into()],
            )])
            .unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_name, "b.pdf");
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = MasterStore::new(dir.path().join("nested").join("master.json"));
        store.append(record("a.pdf")).unwrap();
        assert!(store.exists());
    }
}
