use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// A validated drafting request. The topic is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
    preferences: Option<String>,
}

impl GenerationRequest {
    /// Trims both fields; blank preferences are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::EmptyTopic`] if `topic` is blank.
    pub fn new(topic: &str, preferences: Option<&str>) -> Result<Self, GenerateError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerateError::EmptyTopic);
        }
        let preferences = preferences
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ToOwned::to_owned);
        Ok(Self {
            topic: topic.to_owned(),
            preferences,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn preferences(&self) -> Option<&str> {
        self.preferences.as_deref()
    }
}

/// A drafted post plus the model's reasoning for it.
///
/// `post_text` should fit the platform limit, but that is advisory; the
/// caller enforces it when the user submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub post_text: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// One entry of the diagnostic trail kept while walking the candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub provider_id: String,
    pub outcome: AttemptOutcome,
    pub error_detail: Option<String>,
}
