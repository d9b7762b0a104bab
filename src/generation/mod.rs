//! Idea-to-sections generation pipeline.
//!
//! An idea goes through [`prompt::build_prompt`], one call to a
//! [`ChatProvider`](crate::providers::ChatProvider), and
//! [`normalize::normalize`]. Whenever any of that cannot produce sections the
//! [`fallback`] page is used instead, so [`generator::SiteGenerator::generate`]
//! always yields at least one well-formed [`Section`].

use serde::{Deserialize, Serialize};

pub mod fallback;
pub mod generator;
pub mod normalize;
pub mod prompt;

pub use generator::SiteGenerator;
pub use normalize::NormalizeError;

/// One structured content block of a generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Short title.
    pub name: String,
    /// Short summary.
    pub description: String,
    /// Complete HTML document or HTML fragment.
    pub content: String,
    /// Display hint. Sequence position is authoritative, not this value.
    pub order: u32,
}

/// Why the generator degraded to the fallback page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FallbackReason {
    /// No inference credential was configured.
    #[error("no inference credential configured")]
    MissingCredential,
    /// The provider call failed (transport, status, or payload).
    #[error("provider call failed: {0}")]
    Provider(String),
    /// The provider answered without any message text.
    #[error("provider returned an empty message")]
    EmptyResponse,
    /// The message text could not be turned into sections.
    #[error("response normalization failed: {0}")]
    Normalization(NormalizeError),
    /// The generation attempt panicked.
    #[error("generation attempt panicked")]
    Panicked,
}

/// Result of one generation request, tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Sections produced by the model.
    AiGenerated(Vec<Section>),
    /// Sections produced by the fallback page generator.
    FallbackGenerated {
        /// The single fallback section.
        sections: Vec<Section>,
        /// What forced the fallback.
        reason: FallbackReason,
    },
}

impl GenerationOutcome {
    /// The generated sections, regardless of provenance.
    pub fn sections(&self) -> &[Section] {
        match self {
            Self::AiGenerated(sections) | Self::FallbackGenerated { sections, .. } => sections,
        }
    }

    /// Consume the outcome, keeping only the sections.
    pub fn into_sections(self) -> Vec<Section> {
        match self {
            Self::AiGenerated(sections) | Self::FallbackGenerated { sections, .. } => sections,
        }
    }

    /// Whether the fallback generator produced these sections.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FallbackGenerated { .. })
    }

    /// The fallback reason, if any.
    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::AiGenerated(_) => None,
            Self::FallbackGenerated { reason, .. } => Some(reason),
        }
    }
}
