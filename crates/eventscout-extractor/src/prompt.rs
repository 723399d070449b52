//! Prompt construction for the security-event review

use crate::config::ContentMode;
use eventscout_domain::{DocumentAttachment, InferenceRequest};
use std::path::Path;

/// Builds the inference request for one document
pub struct PromptBuilder<'a> {
    document_path: &'a Path,
    document_name: &'a str,
    content_mode: ContentMode,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(document_path: &'a Path, document_name: &'a str, content_mode: ContentMode) -> Self {
        Self {
            document_path,
            document_name,
            content_mode,
        }
    }

    /// System instruction naming the document and fixing the output format
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(&format!(
            "You are a world class security engineer reviewing {} (part of the latest AUTOSAR specification).\n",
            self.document_path.display()
        ));
        prompt.push_str(REVIEW_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT);
        prompt
    }

    /// User turn instruction
    pub fn user_prompt(&self) -> &'static str {
        if self.content_mode.sends_attachment() {
            ATTACHMENT_INSTRUCTION
        } else {
            TEXT_INSTRUCTION
        }
    }

    /// Assemble the full request
    pub fn build(
        &self,
        document_text: Option<String>,
        attachment: Option<DocumentAttachment>,
    ) -> InferenceRequest {
        InferenceRequest {
            document_name: self.document_name.to_string(),
            system_prompt: self.system_prompt(),
            user_prompt: self.user_prompt().to_string(),
            document_text,
            attachment,
        }
    }
}

const REVIEW_INSTRUCTIONS: &str = "Review the document and identify new, highly relevant security event logs.
Only suggest events that are not similar or identical to existing ones.
If there are no new highly relevant security event logs, do not suggest any.";

// The parser depends on these exact labels and on the ***N/A*** sentinel.
const OUTPUT_FORMAT: &str = "FORMAT (if events exist, one block per event):
Specification section: 'Filename'
System event: 'name of suggested new event'
Suggested log: 'context variable names to be added to the log context'
Rationale: 'reasoning behind choosing this new event'

FORMAT (if no new events):
***N/A***
(explanation of why not)";

const ATTACHMENT_INSTRUCTION: &str =
    "Read the attached BASE64 PDF file and extract the findings according to the system instructions.";

const TEXT_INSTRUCTION: &str =
    "Read the document text below and extract the findings according to the system instructions.";
