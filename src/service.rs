//! Website idea service: boundary validation, generation, persistence.

use tracing::info;

use crate::generation::{FallbackReason, SiteGenerator};
use crate::store::{IdeaStatus, IdeaStore, IdeaUpdate, NewIdea, StoreError, WebsiteIdea};

/// Minimum idea length in characters.
pub const MIN_IDEA_CHARS: usize = 10;

/// Maximum idea length in characters.
pub const MAX_IDEA_CHARS: usize = 200;

/// Idea text rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdeaError {
    /// Fewer than [`MIN_IDEA_CHARS`] characters.
    #[error("website idea must be at least {MIN_IDEA_CHARS} characters long (got {0})")]
    TooShort(usize),
    /// More than [`MAX_IDEA_CHARS`] characters.
    #[error("website idea must not be longer than {MAX_IDEA_CHARS} characters (got {0})")]
    TooLong(usize),
}

/// Errors visible to callers of the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The idea failed validation.
    #[error(transparent)]
    Invalid(#[from] IdeaError),
    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Trim an idea and check its length.
///
/// # Errors
///
/// Returns [`IdeaError`] when the trimmed idea is outside 10–200 characters.
pub fn validate_idea(idea: &str) -> Result<&str, IdeaError> {
    let trimmed = idea.trim();
    let len = trimmed.chars().count();
    if len < MIN_IDEA_CHARS {
        return Err(IdeaError::TooShort(len));
    }
    if len > MAX_IDEA_CHARS {
        return Err(IdeaError::TooLong(len));
    }
    Ok(trimmed)
}

/// A freshly created idea and how its sections were produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIdea {
    /// The stored record.
    pub record: WebsiteIdea,
    /// Set when the fallback page was used.
    pub fallback: Option<FallbackReason>,
}

/// Generates and stores website ideas.
#[derive(Debug, Clone)]
pub struct WebsiteIdeaService {
    generator: SiteGenerator,
    store: IdeaStore,
}

impl WebsiteIdeaService {
    /// Combine a generator and a store.
    pub fn new(generator: SiteGenerator, store: IdeaStore) -> Self {
        Self { generator, store }
    }

    /// Validate, generate sections, and persist with status `completed`.
    ///
    /// Generation never fails; only validation and storage errors surface.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Invalid`] for a bad idea and
    /// [`ServiceError::Store`] if persistence fails.
    pub async fn create(
        &self,
        idea: &str,
        user_id: Option<String>,
    ) -> Result<CreatedIdea, ServiceError> {
        let idea = validate_idea(idea)?;
        let outcome = self.generator.generate(idea).await;
        let fallback = outcome.fallback_reason().cloned();

        let record = self
            .store
            .create(NewIdea {
                idea: idea.to_owned(),
                user_id: user_id.filter(|u| !u.trim().is_empty()),
                sections: outcome.into_sections(),
                status: IdeaStatus::Completed,
            })
            .await?;

        info!(
            id = %record.id,
            fallback = fallback.is_some(),
            "website idea created"
        );
        Ok(CreatedIdea { record, fallback })
    }

    /// All ideas, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the query fails.
    pub async fn list(&self) -> Result<Vec<WebsiteIdea>, ServiceError> {
        Ok(self.store.list().await?)
    }

    /// One idea by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] (wrapped) if the id is unknown.
    pub async fn get(&self, id: &str) -> Result<WebsiteIdea, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    /// Apply a partial update. A replacement idea text is validated.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Invalid`] for a bad idea and
    /// [`ServiceError::Store`] if the id is unknown or the write fails.
    pub async fn update(&self, id: &str, mut update: IdeaUpdate) -> Result<WebsiteIdea, ServiceError> {
        if let Some(idea) = update.idea.take() {
            update.idea = Some(validate_idea(&idea)?.to_owned());
        }
        Ok(self.store.update(id, update).await?)
    }

    /// Delete an idea.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the id is unknown or the write fails.
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.store.delete(id).await?)
    }
}
