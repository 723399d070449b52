//! PDF text extraction

use eventscout_domain::TextExtractor;
use std::path::Path;
use thiserror::Error;

/// Errors from [`PdfTextExtractor`]
#[derive(Error, Debug)]
pub enum PdfError {
    /// The file could not be read
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),

    /// The file is not a PDF we can parse
    #[error("cannot parse PDF: {0}")]
    Parse(String),
}

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages yield nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Extract text from an in-memory PDF
    pub fn extract_from_bytes(&self, pdf_bytes: &[u8]) -> Result<String, PdfError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        Ok(join_pages(pages))
    }
}

impl TextExtractor for PdfTextExtractor {
    type Error = PdfError;

    fn extract_text(&self, path: &Path) -> Result<String, PdfError> {
        let bytes = std::fs::read(path)?;
        self.extract_from_bytes(&bytes)
    }
}

/// Concatenate page texts, one newline after each, skipping empty pages
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut text = String::new();
    for page in pages {
        if page.is_empty() {
            continue;
        }
        text.push_str(&page);
        text.push('\n');
    }
    text.trim().to_string()
}
