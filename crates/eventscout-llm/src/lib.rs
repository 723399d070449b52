//! eventscout Inference Provider Layer
//!
//! Implementations of the `InferenceProvider` trait from `eventscout-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible chat completions API
//!   (Perplexity by default)
//!
//! # Examples
//!
//! ```
//! use eventscout_llm::MockProvider;
//! use eventscout_domain::{InferenceProvider, InferenceRequest};
//!
//! # async fn example() {
//! let provider = MockProvider::new("***N/A***\nNothing new.");
//! let request = InferenceRequest {
//!     document_name: "a.pdf".to_string(),
//!     system_prompt: "review".to_string(),
//!     user_prompt: "go".to_string(),
//!     document_text: None,
//!     attachment: None,
//! };
//! let reply = provider.complete(&request).await.unwrap();
//! assert!(reply.starts_with("***N/A***"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod chat;

use eventscout_domain::{InferenceProvider, InferenceRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use chat::{ChatCompletionsProvider, ChatSettings};

/// Errors that can occur during inference
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credential rejected
    #[error("Unauthorized: check the API key")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The HTTP request timed out
    #[error("Request timed out")]
    Timeout,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock inference provider for deterministic testing
///
/// Replies are keyed by document name. Every request is recorded so tests can
/// inspect what would have been sent.
///
/// # Examples
///
/// ```
/// use eventscout_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("a.pdf", "***N/A***\nnone");
/// provider.add_error("broken.pdf");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    requests: Arc<Mutex<Vec<InferenceRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all documents
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            replies: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given document
    pub fn add_response(&mut self, document_name: impl Into<String>, response: impl Into<String>) {
        lock(&self.replies).insert(document_name.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific document
    pub fn add_error(&mut self, document_name: impl Into<String>) {
        lock(&self.replies).insert(document_name.into(), MockReply::Error);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<InferenceRequest> {
        lock(&self.requests).clone()
    }

    /// Forget recorded requests
    pub fn reset(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("***N/A***\nDefault mock response")
    }
}

impl InferenceProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &InferenceRequest) -> Result<String, LlmError> {
        lock(&self.requests).push(request.clone());

        let reply = lock(&self.replies).get(&request.document_name).cloned();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
