//! Chat Completions Provider Implementation
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The defaults
//! target Perplexity's `sonar` model.
//!
//! # Features
//!
//! - System instruction plus a multi-part user turn (text and base64 file)
//! - Fixed sampling settings (low temperature, bounded output length)
//! - Per-request timeout
//!
//! # Examples
//!
//! ```no_run
//! use eventscout_llm::{ChatCompletionsProvider, ChatSettings};
//!
//! let provider = ChatCompletionsProvider::new("pplx-...", ChatSettings::default()).unwrap();
//! ```

use crate::LlmError;
use eventscout_domain::{InferenceProvider, InferenceRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Default model
pub const DEFAULT_MODEL: &str = "sonar";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default completion length cap
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default HTTP timeout (5 minutes)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Connection and sampling settings for [`ChatCompletionsProvider`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens in the answer
    pub max_tokens: u32,

    /// HTTP timeout per request (seconds)
    pub request_timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Provider backed by an OpenAI-compatible chat completions API
pub struct ChatCompletionsProvider {
    settings: ChatSettings,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text {
        text: String,
    },
    FileUrl {
        file_url: FileUrl<'a>,
        file_name: &'a str,
    },
}

#[derive(Serialize)]
struct FileUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Other`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, settings: ChatSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            settings,
            api_key: api_key.into(),
            client,
        })
    }

    /// Active settings
    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Full chat completions URL
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    fn build_body<'a>(&'a self, request: &'a InferenceRequest) -> ChatRequest<'a> {
        let mut text = request.user_prompt.clone();
        if let Some(document_text) = &request.document_text {
            text.push_str("\n\nDocument text:\n---\n");
            text.push_str(document_text);
            text.push_str("\n---");
        }

        let mut parts = vec![ContentPart::Text { text }];
        if let Some(attachment) = &request.attachment {
            parts.push(ContentPart::FileUrl {
                file_url: FileUrl {
                    url: &attachment.base64,
                },
                file_name: &attachment.file_name,
            });
        }

        ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(&request.system_prompt),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(parts),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    async fn send(&self, request: &InferenceRequest) -> Result<String, LlmError> {
        let body = self.build_body(request);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            let parsed = response
                .json::<ChatResponse>()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
            return extract_content(parsed);
        }

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(LlmError::Unauthorized)
            }
            reqwest::StatusCode::NOT_FOUND => {
                Err(LlmError::ModelNotAvailable(self.settings.model.clone()))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(LlmError::RateLimitExceeded),
            _ => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)))
            }
        }
    }
}

fn extract_content(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
}

impl InferenceProvider for ChatCompletionsProvider {
    type Error = LlmError;

    async fn complete(&self, request: &InferenceRequest) -> Result<String, LlmError> {
        debug!(
            "Sending '{}' to {} ({})",
            request.document_name,
            self.endpoint(),
            self.settings.model
        );
        self.send(request).await
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
