//! Ordered first-success walk over model candidates with a canned fallback.

use std::sync::Arc;
use std::time::Duration;

use tweetsmith_core::AppConfig;

use crate::error::ProviderError;
use crate::parse::extract_draft;
use crate::placeholder::pick_placeholder;
use crate::prompt::{build_prompt, ChatPrompt};
use crate::providers::{CompletionProvider, GeminiClient, OpenRouterClient};
use crate::types::{AttemptOutcome, GenerationRequest, GenerationResult, ProviderAttempt};

/// Head-room on top of the HTTP client timeout before an attempt is abandoned.
const ATTEMPT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// One model on one provider.
#[derive(Clone)]
pub struct Candidate {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl Candidate {
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// `provider:model`, e.g. `openrouter:qwen/qwen-2.5-72b-instruct:free`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}:{}", self.provider.name(), self.model)
    }

    async fn attempt(
        &self,
        prompt: &ChatPrompt,
        timeout: Duration,
    ) -> Result<GenerationResult, ProviderError> {
        let raw = tokio::time::timeout(timeout, self.provider.complete(&self.model, prompt))
            .await
            .map_err(|_| ProviderError::Timeout(timeout))??;
        extract_draft(&raw)
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Candidate").field(&self.id()).finish()
    }
}

/// What [`Generator::generate_traced`] produced and how it got there.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub result: GenerationResult,
    /// Candidate id that produced `result`; `None` for a placeholder.
    pub source: Option<String>,
    pub attempts: Vec<ProviderAttempt>,
}

/// Drafts posts by trying each candidate once, in declared order.
///
/// Candidates run strictly one after another: a later candidate is only
/// called after every earlier one has failed, so no quota is spent on
/// answers that would be discarded.
#[derive(Debug, Clone)]
pub struct Generator {
    candidates: Vec<Candidate>,
    attempt_timeout: Duration,
}

impl Generator {
    #[must_use]
    pub fn new(candidates: Vec<Candidate>, attempt_timeout: Duration) -> Self {
        Self {
            candidates,
            attempt_timeout,
        }
    }

    /// Builds the production chain: every configured OpenRouter model in
    /// order, then Gemini direct.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let openrouter: Arc<dyn CompletionProvider> = Arc::new(
            OpenRouterClient::new(
                config.openrouter_api_key.clone(),
                config.provider_timeout_secs,
            )?
            .with_attribution(&config.site_url, &config.app_title)
            .with_json_mode(config.openrouter_json_mode),
        );
        let gemini: Arc<dyn CompletionProvider> = Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.provider_timeout_secs,
        )?);

        let mut candidates: Vec<Candidate> = config
            .openrouter_models
            .iter()
            .map(|model| Candidate::new(Arc::clone(&openrouter), model.as_str()))
            .collect();
        candidates.push(Candidate::new(gemini, config.gemini_model.as_str()));

        Ok(Self::new(
            candidates,
            Duration::from_secs(config.provider_timeout_secs) + ATTEMPT_TIMEOUT_MARGIN,
        ))
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Drafts a post for `request`. Never fails; the worst case is a
    /// placeholder draft mentioning the topic.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.generate_traced(request).await.result
    }

    /// Like [`Generator::generate`], also returning the attempt trail.
    pub async fn generate_traced(&self, request: &GenerationRequest) -> GenerationReport {
        let prompt = build_prompt(request);
        let mut attempts = Vec::with_capacity(self.candidates.len());

        for candidate in &self.candidates {
            let provider_id = candidate.id();
            tracing::info!(candidate = %provider_id, "attempting generation");

            match candidate.attempt(&prompt, self.attempt_timeout).await {
                Ok(result) => {
                    attempts.push(ProviderAttempt {
                        provider_id: provider_id.clone(),
                        outcome: AttemptOutcome::Success,
                        error_detail: None,
                    });
                    return GenerationReport {
                        result,
                        source: Some(provider_id),
                        attempts,
                    };
                }
                Err(e) => {
                    tracing::warn!(candidate = %provider_id, error = %e, "candidate failed");
                    attempts.push(ProviderAttempt {
                        provider_id,
                        outcome: AttemptOutcome::Failure,
                        error_detail: Some(e.to_string()),
                    });
                }
            }
        }

        tracing::error!(
            attempts = ?attempts,
            "all generation candidates failed; returning placeholder draft"
        );
        GenerationReport {
            result: pick_placeholder(request.topic()),
            source: None,
            attempts,
        }
    }
}
