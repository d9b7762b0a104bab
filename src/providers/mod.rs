//! Chat-completion provider abstraction.
//!
//! Defines the [`ChatProvider`] trait and the request/response types the
//! generation pipeline speaks. One implementation ships:
//! - [`openai::OpenAiCompatProvider`]: any OpenAI-compatible
//!   `/chat/completions` endpoint (GitHub Models by default)

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod openai;

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

/// Sampling parameters sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 6000,
        }
    }
}

/// A single-shot chat completion request: one system and one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System-role directive.
    pub system: String,
    /// User-role directive.
    pub user: String,
    /// Sampling parameters.
    pub sampling: SamplingConfig,
    /// Target model identifier.
    pub model: String,
}

/// Usage statistics for a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageStats {
    /// Tokens used in the prompt.
    pub input_tokens: u32,
    /// Tokens generated in the response.
    pub output_tokens: u32,
}

/// The response from a chat provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Assistant message text, if the provider returned any.
    pub text: Option<String>,
    /// Provider-reported finish reason.
    pub finish_reason: Option<String>,
    /// Token usage.
    pub usage: UsageStats,
    /// The model identifier that served this response.
    pub model: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by chat providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure (connect, timeout, body read).
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match the expected schema.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// Upstream responded with a non-success status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// Upstream responded 2xx but the body carried an error payload.
    #[error("provider returned an error payload: {0}")]
    Api(String),
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_error_body(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact token-like values and cap the length of an
/// upstream error body before it reaches logs.
pub fn sanitize_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"github_pat_[A-Za-z0-9_]{20,}",
        r"gh[pousr]_[A-Za-z0-9]{20,}",
        r"sk-[A-Za-z0-9_\-]{20,}",
        r"Bearer\s+[A-Za-z0-9._\-]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The inference capability consumed by the generator.
///
/// Implementations must be `Send + Sync` so a generator can be shared across
/// concurrent requests.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Request a single chat completion.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on network, status, or parse failure.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// The model identifier this provider was configured for.
    fn model_id(&self) -> &str;
}
