//! OpenAI-compatible provider using the `/chat/completions` API.
//!
//! The default endpoint is GitHub Models inference, which speaks the same
//! wire format and authenticates with a GitHub token as a bearer credential.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{check_http_response, ChatProvider, ChatRequest, ChatResponse, ProviderError, UsageStats};

/// Default chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier.
    pub model: String,
    /// System and user messages.
    pub messages: Vec<OpenAiMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Maximum completion tokens.
    pub max_tokens: u32,
}

/// A message in chat format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiMessage {
    /// Role (`system` or `user`).
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// Chat completions response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponse {
    /// Response choices.
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
    /// Model that served the response.
    pub model: Option<String>,
    /// Token usage.
    pub usage: Option<OpenAiUsage>,
    /// Error payload some gateways return with a 2xx status.
    pub error: Option<Value>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    /// Assistant message for this choice.
    pub message: Option<OpenAiResponseMessage>,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// Assistant message.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponseMessage {
    /// Optional text content.
    pub content: Option<String>,
}

/// Usage statistics.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt token count.
    pub prompt_tokens: Option<u32>,
    /// Completion token count.
    pub completion_tokens: Option<u32>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Provider for any OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiCompatProvider {
    model: String,
    token: String,
    endpoint: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatProvider {
    /// Create a provider against [`DEFAULT_ENDPOINT`].
    pub fn new(model: String, token: String) -> Self {
        Self::with_base_url(model, token, DEFAULT_ENDPOINT.to_owned())
    }

    /// Create a provider against a custom chat completions URL.
    pub fn with_base_url(model: String, token: String, endpoint: String) -> Self {
        Self {
            model,
            token,
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// Apply a whole-request timeout to the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build the wire request from a chat request.
#[doc(hidden)]
pub fn build_request(request: &ChatRequest) -> OpenAiRequest {
    OpenAiRequest {
        model: request.model.clone(),
        messages: vec![
            OpenAiMessage {
                role: "system".to_owned(),
                content: request.system.clone(),
            },
            OpenAiMessage {
                role: "user".to_owned(),
                content: request.user.clone(),
            },
        ],
        temperature: request.sampling.temperature,
        top_p: request.sampling.top_p,
        max_tokens: request.sampling.max_tokens,
    }
}

/// Parse a chat completions response body.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if the body is not a completions response
/// or has no first choice, and `ProviderError::Api` if it carries an error
/// payload.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<ChatResponse, ProviderError> {
    let resp: OpenAiResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if let Some(error) = resp.error {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| error.to_string());
        return Err(ProviderError::Api(super::sanitize_error_body(&message)));
    }

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("missing choices[0]".to_owned()))?;

    let usage = UsageStats {
        input_tokens: resp
            .usage
            .as_ref()
            .and_then(|u| u.prompt_tokens)
            .unwrap_or(0),
        output_tokens: resp
            .usage
            .as_ref()
            .and_then(|u| u.completion_tokens)
            .unwrap_or(0),
    };

    Ok(ChatResponse {
        text: choice.message.and_then(|m| m.content),
        finish_reason: choice.finish_reason,
        usage,
        model: resp.model.unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl ChatProvider for OpenAiCompatProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let api_request = build_request(&request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.token))
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
