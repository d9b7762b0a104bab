//! End-to-end generation attempt with fallback containment.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::InferenceConfig;
use crate::credentials::Credentials;
use crate::providers::openai::OpenAiCompatProvider;
use crate::providers::{ChatProvider, ChatRequest, SamplingConfig};

use super::fallback::fallback_sections;
use super::normalize::normalize;
use super::prompt::build_prompt;
use super::{FallbackReason, GenerationOutcome, Section};

/// Characters of raw model output included in debug logs.
const PREVIEW_CHARS: usize = 200;

/// Turns ideas into sections, degrading to the fallback page on any failure.
///
/// Holds no per-request state; one instance can serve concurrent calls.
#[derive(Clone)]
pub struct SiteGenerator {
    provider: Option<Arc<dyn ChatProvider>>,
    sampling: SamplingConfig,
}

impl std::fmt::Debug for SiteGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteGenerator")
            .field("model", &self.provider.as_ref().map(|p| p.model_id()))
            .field("sampling", &self.sampling)
            .finish()
    }
}

impl SiteGenerator {
    /// Create a generator. `None` means no credential: every call falls back.
    pub fn new(provider: Option<Arc<dyn ChatProvider>>) -> Self {
        Self {
            provider,
            sampling: SamplingConfig::default(),
        }
    }

    /// Override the sampling parameters.
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Build a generator from the `[inference]` config and loaded credentials.
    ///
    /// A missing credential is a supported mode and yields a provider-less
    /// generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &InferenceConfig, credentials: &Credentials) -> anyhow::Result<Self> {
        let sampling = config.sampling();
        let Some(token) = credentials.resolve(&config.credential_key) else {
            info!(key = %config.credential_key, "no inference credential, fallback-only mode");
            return Ok(Self::new(None).with_sampling(sampling));
        };

        let mut provider =
            OpenAiCompatProvider::with_base_url(config.model.clone(), token, config.endpoint.clone());
        if let Some(secs) = config.request_timeout_secs {
            provider = provider.with_timeout(Duration::from_secs(secs))?;
        }
        debug!(model = %config.model, endpoint = %config.endpoint, "inference provider configured");

        Ok(Self::new(Some(Arc::new(provider))).with_sampling(sampling))
    }

    /// Whether a provider is configured.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate sections for an idea. Never fails.
    pub async fn generate(&self, idea: &str) -> GenerationOutcome {
        let Some(provider) = self.provider.clone() else {
            warn!("inference credential not found, using fallback page");
            return fallback(idea, FallbackReason::MissingCredential);
        };

        let prompt = build_prompt(idea);
        let request = ChatRequest {
            system: prompt.system,
            user: prompt.user,
            sampling: self.sampling,
            model: provider.model_id().to_owned(),
        };

        // Own task so a panic in the provider or normalizer is observed as a
        // join error instead of unwinding into the caller.
        match tokio::spawn(attempt(provider, request)).await {
            Ok(Ok(sections)) => {
                info!(count = sections.len(), "generated sections with model");
                GenerationOutcome::AiGenerated(sections)
            }
            Ok(Err(reason)) => fallback(idea, reason),
            Err(join_error) => {
                error!(
                    panicked = join_error.is_panic(),
                    "generation attempt aborted, using fallback page"
                );
                fallback(idea, FallbackReason::Panicked)
            }
        }
    }
}

async fn attempt(
    provider: Arc<dyn ChatProvider>,
    request: ChatRequest,
) -> Result<Vec<Section>, FallbackReason> {
    let response = provider.complete(request).await.map_err(|e| {
        error!(error = %e, "inference request failed, using fallback page");
        FallbackReason::Provider(e.to_string())
    })?;

    let Some(text) = response.text.filter(|t| !t.trim().is_empty()) else {
        warn!("no content received from model, using fallback page");
        return Err(FallbackReason::EmptyResponse);
    };

    debug!(
        model = %response.model,
        output_tokens = response.usage.output_tokens,
        preview = %text.chars().take(PREVIEW_CHARS).collect::<String>(),
        "model response received"
    );

    normalize(&text).map_err(|e| {
        warn!(error = %e, raw = %text, "failed to parse model response, using fallback page");
        FallbackReason::Normalization(e)
    })
}

fn fallback(idea: &str, reason: FallbackReason) -> GenerationOutcome {
    GenerationOutcome::FallbackGenerated {
        sections: fallback_sections(idea),
        reason,
    }
}
