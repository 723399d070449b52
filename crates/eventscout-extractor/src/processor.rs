//! Core Processor implementation

use crate::config::ProcessorConfig;
use crate::discovery::discover_documents;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::types::{DocumentFailure, DocumentOutcome, DocumentState, RunSummary};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use eventscout_domain::{
    AnalysisRecord, Confirmation, DocumentAttachment, InferenceProvider, InferenceRequest,
    TextExtractor,
};
use eventscout_store::MasterStore;
use std::path::Path;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Question asked before the first run creates the master file
pub const FULL_RUN_QUESTION: &str =
    "No master file found. This run will analyze every document in the source directory. Continue?";

/// Drives documents from the source directory through inference into the store
pub struct Processor<L, X>
where
    L: InferenceProvider,
    X: TextExtractor,
{
    provider: L,
    extractor: X,
    store: MasterStore,
    config: ProcessorConfig,
}

impl<L, X> Processor<L, X>
where
    L: InferenceProvider,
    X: TextExtractor,
{
    /// Create a new Processor
    pub fn new(provider: L, extractor: X, store: MasterStore, config: ProcessorConfig) -> Self {
        Self {
            provider,
            extractor,
            store,
            config,
        }
    }

    /// The master store records are appended to
    pub fn store(&self) -> &MasterStore {
        &self.store
    }

    /// The inference provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Process every document in `source_dir` that the store does not hold yet
    ///
    /// When the master file is missing the operator is asked to confirm
    /// first; declining returns an aborted summary without touching anything.
    ///
    /// A failing document is logged and left out of the store so the next
    /// run retries it. With `fail_fast` set the first failure is returned
    /// as the error instead. Store errors always end the run.
    pub async fn run(
        &self,
        source_dir: &Path,
        confirmation: &mut dyn Confirmation,
    ) -> Result<RunSummary, ExtractorError> {
        if !self.store.exists() && !confirmation.confirm(FULL_RUN_QUESTION)? {
            info!("Run declined by operator");
            return Ok(RunSummary::aborted());
        }

        let documents =
            discover_documents(source_dir).map_err(|source| ExtractorError::SourceDir {
                path: source_dir.to_path_buf(),
                source,
            })?;

        info!(
            "Found {} candidate documents in {} (model: {})",
            documents.len(),
            source_dir.display(),
            self.provider.model_name()
        );

        let mut summary = RunSummary::default();
        for path in &documents {
            let document_name = document_name(path);
            match self.process_document(path).await {
                Ok(DocumentOutcome::Appended { document_name, .. }) => {
                    summary.appended.push(document_name);
                }
                Ok(DocumentOutcome::Skipped { document_name }) => {
                    summary.skipped.push(document_name);
                }
                // The store is shared by every document, so its errors end the run
                Err(e @ ExtractorError::Store(_)) => return Err(e),
                Err(e) if self.config.fail_fast => return Err(e),
                Err(e) => {
                    warn!("Failed to process {}: {}", document_name, e);
                    summary.failed.push(DocumentFailure {
                        document_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Run finished: {} appended, {} skipped, {} failed",
            summary.appended.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Process a single document
    ///
    /// Nothing is written unless every step succeeds.
    pub async fn process_document(&self, path: &Path) -> Result<DocumentOutcome, ExtractorError> {
        let document_name = document_name(path);
        debug!("{}: {}", document_name, DocumentState::Unseen);

        if self.store.contains(&document_name)? {
            info!("Skipping {} (already in master file)", document_name);
            debug!("{}: {}", document_name, DocumentState::Skipped);
            return Ok(DocumentOutcome::Skipped { document_name });
        }

        info!("Processing {}", path.display());
        let text = self
            .extractor
            .extract_text(path)
            .map_err(|e| ExtractorError::Extraction {
                document: document_name.clone(),
                reason: e.to_string(),
            })?;
        debug!("{}: {} ({} chars)", document_name, DocumentState::Extracted, text.chars().count());

        let request = self.build_request(path, &document_name, text)?;
        let response = self.call_provider(&request).await?;
        debug!("{}: {}", document_name, DocumentState::Inferred);
        info!("Response preview: {}", preview(&response, self.config.preview_chars));

        let events = parse_response(&response);
        debug!("{}: {} ({} entries)", document_name, DocumentState::Parsed, events.len());

        let record = AnalysisRecord::new(document_name.clone(), events);
        let event_count = record.event_count;
        let total_records = self.store.append(record)?;
        debug!("{}: {}", document_name, DocumentState::Appended);

        Ok(DocumentOutcome::Appended {
            document_name,
            event_count,
            total_records,
        })
    }

    fn build_request(
        &self,
        path: &Path,
        document_name: &str,
        text: String,
    ) -> Result<InferenceRequest, ExtractorError> {
        let mode = self.config.content_mode;

        let document_text = mode
            .sends_text()
            .then(|| truncate_chars(text, self.config.max_text_chars, document_name));

        let attachment = if mode.sends_attachment() {
            let bytes = std::fs::read(path)?;
            Some(DocumentAttachment {
                file_name: document_name.to_string(),
                base64: STANDARD.encode(bytes),
            })
        } else {
            None
        };

        Ok(PromptBuilder::new(path, document_name, mode).build(document_text, attachment))
    }

    async fn call_provider(&self, request: &InferenceRequest) -> Result<String, ExtractorError> {
        timeout(self.config.inference_timeout(), self.provider.complete(request))
            .await
            .map_err(|_| ExtractorError::Timeout(self.config.inference_timeout_secs))?
            .map_err(|e| ExtractorError::Llm(e.to_string()))
    }
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate_chars(mut text: String, max_chars: usize, document_name: &str) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        warn!(
            "Text of {} exceeds {} characters, truncating",
            document_name, max_chars
        );
        text.truncate(byte_index);
    }
    text
}

fn preview(response: &str, max_chars: usize) -> String {
    match response.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &response[..byte_index]),
        None => response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_chars("äöüß".to_string(), 2, "a.pdf"), "äö");
        assert_eq!(truncate_chars("short".to_string(), 10, "a.pdf"), "short");
        assert_eq!(truncate_chars("exact".to_string(), 5, "a.pdf"), "exact");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
        assert_eq!(preview("ab", 3), "ab");
    }

    #[test]
    fn test_document_name() {
        assert_eq!(document_name(Path::new("/a/b/SWS_Dem.pdf")), "SWS_Dem.pdf");
    }
}
