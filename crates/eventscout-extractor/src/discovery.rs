//! Finding input documents in the source directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Substring a file name must contain to be treated as a document
const DOCUMENT_MARKER: &str = ".pdf";

/// List candidate documents in `dir`
///
/// Keeps regular files whose name contains `.pdf` anywhere (so
/// `notes.pdf.bak` qualifies). Order is whatever the directory listing
/// yields; it is not sorted.
pub fn discover_documents(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && entry.file_name().to_string_lossy().contains(DOCUMENT_MARKER) {
            documents.push(path);
        }
    }
    Ok(documents)
}
