//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;
use std::path::Path;

/// A source document attached to an inference request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAttachment {
    /// File name shown to the model
    pub file_name: String,

    /// Base64-encoded document bytes
    pub base64: String,
}

/// Everything sent to the inference collaborator for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    /// Name of the document under review
    pub document_name: String,

    /// System instruction, including the required output format
    pub system_prompt: String,

    /// User turn instruction
    pub user_prompt: String,

    /// Extracted document text, if sent inline
    pub document_text: Option<String>,

    /// Raw document, if sent as an attachment
    pub attachment: Option<DocumentAttachment>,
}

/// Trait for the language-model call
///
/// Implemented by the infrastructure layer (eventscout-llm). One call per
/// document, no retries.
pub trait InferenceProvider {
    /// Error type for inference operations
    type Error: std::fmt::Display;

    /// Send the request and return the model's free-text answer
    fn complete(
        &self,
        request: &InferenceRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}

/// Trait for turning a document into plain text
///
/// Implemented by the application layer (eventscout-extractor)
pub trait TextExtractor {
    /// Error type for extraction operations
    type Error: std::fmt::Display;

    /// Extract the full text of the document at `path`
    fn extract_text(&self, path: &Path) -> Result<String, Self::Error>;
}

/// Trait for asking the operator to confirm a full run
///
/// Lets a non-interactive answer replace the terminal prompt without
/// changing the processing flow.
pub trait Confirmation {
    /// Ask `question`; returns true to proceed
    fn confirm(&mut self, question: &str) -> std::io::Result<bool>;
}

/// Confirmation provider with a fixed answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirmation for AutoConfirm {
    fn confirm(&mut self, _question: &str) -> std::io::Result<bool> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm(true).confirm("continue?").unwrap());
        assert!(!AutoConfirm(false).confirm("continue?").unwrap());
    }
}
